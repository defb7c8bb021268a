//! Block directive markers for single-pass Markdown parsing.
//!
//! Block directive lines are replaced by HTML comment markers before the
//! document goes through pulldown-cmark in one pass. Each marker is a type 2
//! HTML block, so it interrupts paragraphs, keeps its place inside list items
//! and blockquotes, and leaves reference definitions visible to the whole
//! document. The tree builder turns marker blocks back into directive nodes.
//!
//! ```text
//! - item                 - item
//!
//!   :::info{#tip}   →      <!--docu-directive:0-->
//!   inside                 inside
//!   :::                    <!--docu-directive:1-->
//! ```

use std::borrow::Cow;
use std::fmt::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::fence::{FenceLine, FenceTracker};
use super::parser::{ParsedDirective, parse_block_line};
use crate::tree::Directive;

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--docu-directive:(\d+)-->").unwrap());

/// A block directive line taken out of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BlockMarker {
    /// `:::name[label]{attrs}`
    Open {
        directive: Directive,
        label: String,
        colon_count: usize,
        line: String,
    },
    /// `:::`
    Close { colon_count: usize, line: String },
    /// `::name[label]{attrs}`
    Leaf {
        directive: Directive,
        label: String,
        line: String,
    },
}

impl BlockMarker {
    /// The directive line as written, without its container prefix.
    pub(crate) fn line(&self) -> &str {
        match self {
            Self::Open { line, .. } | Self::Close { line, .. } | Self::Leaf { line, .. } => line,
        }
    }
}

/// Replace block directive lines with markers.
///
/// A directive line may sit behind list indentation or blockquote markers;
/// that prefix is kept in front of the marker. Lines inside fenced code are
/// left alone.
pub(crate) fn mark_block_directives(source: &str) -> (Cow<'_, str>, Vec<BlockMarker>) {
    let mut fence = FenceTracker::new();
    let mut markers = Vec::new();
    let mut out = String::with_capacity(source.len());

    for line in source.split_inclusive('\n') {
        let body = line.trim_start_matches([' ', '\t', '>']);
        let prefix = &line[..line.len() - body.len()];

        if fence.update(body) != FenceLine::Outside {
            out.push_str(line);
            continue;
        }

        let Some(parsed) = parse_block_line(body) else {
            out.push_str(line);
            continue;
        };

        let text = body.trim_end_matches(['\n', '\r']).to_owned();
        let marker = match parsed {
            ParsedDirective::ContainerStart {
                directive,
                label,
                colon_count,
            } => BlockMarker::Open {
                directive,
                label,
                colon_count,
                line: text,
            },
            ParsedDirective::ContainerEnd { colon_count } => BlockMarker::Close {
                colon_count,
                line: text,
            },
            ParsedDirective::Leaf { directive, label } => BlockMarker::Leaf {
                directive,
                label,
                line: text,
            },
            ParsedDirective::Text { .. } => {
                out.push_str(line);
                continue;
            }
        };

        out.push_str(prefix);
        writeln!(out, "<!--docu-directive:{}-->", markers.len()).unwrap();
        markers.push(marker);
    }

    if markers.is_empty() {
        (Cow::Borrowed(source), markers)
    } else {
        (Cow::Owned(out), markers)
    }
}

/// Index of the marker an HTML block consists of, if it is exactly one.
pub(crate) fn marker_index(html: &str) -> Option<usize> {
    let caps = MARKER_RE.captures(html.trim())?;
    let whole = caps.get(0)?;
    if whole.len() != html.trim().len() {
        return None;
    }
    caps[1].parse().ok()
}

/// Put the original directive lines back in place of markers.
///
/// Used for markers that ended up inside code, raw HTML or a paragraph.
pub(crate) fn restore_markers<'a>(text: &'a str, markers: &[BlockMarker]) -> Cow<'a, str> {
    if markers.is_empty() {
        return Cow::Borrowed(text);
    }
    MARKER_RE.replace_all(text, |caps: &Captures<'_>| {
        caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|index| markers.get(index))
            .map_or_else(|| caps[0].to_owned(), |marker| marker.line().to_owned())
    })
}
