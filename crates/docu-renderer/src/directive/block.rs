//! Block-level directive segmentation.
//!
//! Splits an MDX document into runs of ordinary text, leaf directives and
//! (possibly nested) container directives. Text runs stay raw source for
//! the MDX compiler.

use std::mem;

use super::fence::{FenceLine, FenceTracker};
use super::parser::{ParsedDirective, parse_block_line};
use crate::tree::Directive;

/// A block-level segment of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Block {
    /// Text without block directives.
    Text(String),
    /// `::name[label]{attrs}`
    Leaf { directive: Directive, label: String },
    /// `:::name[label]{attrs}` ... `:::`
    Container {
        directive: Directive,
        label: String,
        children: Vec<Block>,
    },
}

/// An open container (or the document itself) while scanning.
struct Frame {
    opening: Option<(Directive, String)>,
    colon_count: usize,
    blocks: Vec<Block>,
    text: String,
}

impl Frame {
    fn document() -> Self {
        Self {
            opening: None,
            colon_count: 0,
            blocks: Vec::new(),
            text: String::new(),
        }
    }

    fn container(directive: Directive, label: String, colon_count: usize) -> Self {
        Self {
            opening: Some((directive, label)),
            colon_count,
            blocks: Vec::new(),
            text: String::new(),
        }
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.blocks.push(Block::Text(mem::take(&mut self.text)));
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

/// Split a document into blocks.
///
/// A closing fence closes the innermost open container when it has at least
/// as many colons as that container's opening fence. Containers left open
/// at the end of the document are closed there.
pub(crate) fn split_blocks(source: &str) -> Vec<Block> {
    let mut fence = FenceTracker::new();
    let mut current = Frame::document();
    let mut parents: Vec<Frame> = Vec::new();

    for line in source.split_inclusive('\n') {
        if fence.update(line) != FenceLine::Outside {
            current.text.push_str(line);
            continue;
        }

        match parse_block_line(line) {
            Some(ParsedDirective::ContainerEnd { colon_count })
                if !parents.is_empty() && colon_count >= current.colon_count =>
            {
                close_container(&mut current, &mut parents);
            }
            Some(ParsedDirective::ContainerStart {
                directive,
                label,
                colon_count,
            }) => {
                current.flush();
                let parent =
                    mem::replace(&mut current, Frame::container(directive, label, colon_count));
                parents.push(parent);
            }
            Some(ParsedDirective::Leaf { directive, label }) => {
                current.flush();
                current.blocks.push(Block::Leaf { directive, label });
            }
            _ => current.text.push_str(line),
        }
    }

    while !parents.is_empty() {
        close_container(&mut current, &mut parents);
    }

    current.finish()
}

/// Close `current` and append it to its parent, which becomes current.
fn close_container(current: &mut Frame, parents: &mut Vec<Frame>) {
    let Some(parent) = parents.pop() else {
        return;
    };
    let mut frame = mem::replace(current, parent);
    let opening = frame.opening.take();
    let children = frame.finish();

    if let Some((directive, label)) = opening {
        current.blocks.push(Block::Container {
            directive,
            label,
            children,
        });
    }
}
