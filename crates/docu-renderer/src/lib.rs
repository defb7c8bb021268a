//! Markdown and MDX rendering with admonition directives.
//!
//! This crate turns documentation sources into HTML (or a compiled MDX
//! component) through an explicit, ordered [`Pipeline`]:
//!
//! ```text
//! source ─► ShorthandRewriter ─► TreeParser ─► AdmonitionMapper ─► Highlighter ─► Compiler
//!           (:::tip → :::info{#tip})  (directives → nodes)  (div.alert-tip)
//! ```
//!
//! - [`ShorthandRewriter`] rewrites `:::word` markers on raw text.
//! - [`TreeParser`] parses Markdown (pulldown-cmark) or keeps MDX source,
//!   recognising `:text`, `::leaf` and `:::container` directives.
//! - [`AdmonitionMapper`] attaches `div` render hints with the
//!   `theme-admonition alert alert-<id>` class to every directive.
//! - [`HtmlCompiler`] / [`MdxCompiler`] produce the output.
//!
//! # Example
//!
//! ```
//! use docu_renderer::{Pipeline, RenderOptions};
//!
//! let html = Pipeline::markdown(&RenderOptions::default())
//!     .process(":::tip\nHello\n:::")
//!     .unwrap();
//! assert!(html.contains(r#"<div class="theme-admonition alert alert-tip">"#));
//! ```

mod admonition;
pub mod directive;
mod error;
mod highlight;
mod html;
mod mdx;
mod parse;
mod pipeline;
pub mod properties;
mod shorthand;
pub mod tree;
mod util;

pub use admonition::{ADMONITION_CLASS, AdmonitionMapper, render_hints};
pub use error::RenderError;
pub use highlight::{Highlighter, highlight};
pub use html::{HtmlCompiler, to_html};
pub use mdx::{MdxCompiler, to_mdx};
pub use parse::TreeParser;
pub use pipeline::{Compiler, Pipeline, RenderOptions, TextTransform, TreeTransform};
pub use shorthand::{ShorthandRewriter, rewrite_shorthand};
pub use tree::{Node, NodeKind};
pub use util::escape_html;
