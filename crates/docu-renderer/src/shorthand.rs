//! Admonition shorthand rewriting.
//!
//! Authors write a bare marker such as `:::warning`; the directive parser
//! only understands the canonical form with attributes. Every marker is
//! rewritten to an `info` container carrying the marker word as its `id`:
//!
//! ```text
//! :::warning   →   :::info{#warning}
//! ```
//!
//! The rewrite runs on raw text before parsing and is applied everywhere,
//! code blocks included.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::pipeline::TextTransform;

static SHORTHAND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":::([A-Za-z0-9_]+)").unwrap());

/// Rewrite every `:::word` marker to `:::info{#word}` followed by a newline.
///
/// The captured word keeps its original casing. Returns the input unchanged
/// (borrowed) when there is no marker.
#[must_use]
pub fn rewrite_shorthand(source: &str) -> Cow<'_, str> {
    SHORTHAND_RE.replace_all(source, ":::info{#${1}}\n")
}

/// Text stage applying [`rewrite_shorthand`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ShorthandRewriter;

impl ShorthandRewriter {
    /// Create the rewriter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TextTransform for ShorthandRewriter {
    fn name(&self) -> &'static str {
        "shorthand"
    }

    fn transform<'a>(&self, source: &'a str) -> Cow<'a, str> {
        rewrite_shorthand(source)
    }
}
