//! Generic directive syntax.
//!
//! Recognises the three directive forms on top of Markdown and MDX text:
//!
//! - **Text** (inline): `:name[label]{attrs}`
//! - **Leaf** (block, no content): `::name[label]{attrs}`
//! - **Container** (block with content): `:::name[label]{attrs}` ... `:::`
//!
//! Container fences nest; a closing fence needs at least as many colons as
//! its opening fence. Nothing inside fenced code blocks is treated as a
//! directive.

mod args;
pub(crate) mod block;
mod fence;
pub(crate) mod inline;
pub(crate) mod marker;
mod parser;

pub use args::parse_attributes;
pub(crate) use fence::{FenceLine, FenceTracker};
pub(crate) use parser::parse_attribute_block;
