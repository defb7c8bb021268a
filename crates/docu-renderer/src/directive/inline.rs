//! Inline (text) directive splitting.

use super::parser::{ParsedDirective, find_text_directive, text_directive_at, unclosed_label_at};
use crate::tree::{Directive, Node, NodeKind};

/// An inline directive whose `[` label continues past the end of a text run.
///
/// Emphasis, code or links inside a label split it across sibling nodes; the
/// tree builder looks for the closing `]` in a later text sibling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenLabel {
    pub(crate) name: String,
    /// Label text after the `[`.
    pub(crate) label: String,
    /// Bracket depth at the end of `label`.
    pub(crate) depth: usize,
}

/// Split Markdown text into text nodes and text directive nodes.
///
/// The input is the merged text of adjacent text events, so code spans have
/// already been taken out by the Markdown parser. A directive whose label
/// is still open at the end of the text is returned separately.
pub(crate) fn split_text(text: &str) -> (Vec<Node>, Option<OpenLabel>) {
    let mut nodes = Vec::new();
    let mut rest = text;

    while let Some((parsed, start, end)) = find_text_directive(rest) {
        if start > 0 {
            nodes.push(Node::text(&rest[..start]));
        }
        if let Some((name, label_start)) = unclosed_label_at(rest, start) {
            let label = &rest[label_start..];
            let depth = 1 + label.matches('[').count() - label.matches(']').count();
            let open = OpenLabel {
                name,
                label: label.to_owned(),
                depth,
            };
            return (nodes, Some(open));
        }
        if let ParsedDirective::Text { directive, label } = parsed {
            nodes.push(text_directive(directive, (!label.is_empty()).then(|| Node::text(label))));
        }
        rest = &rest[end..];
    }

    if !rest.is_empty() {
        nodes.push(Node::text(rest));
    }
    (nodes, None)
}

/// Find the `]` that brings the bracket depth to zero.
///
/// `depth` carries over between text runs.
pub(crate) fn label_close(text: &str, depth: &mut usize) -> Option<usize> {
    for (i, c) in text.char_indices() {
        match c {
            '[' => *depth += 1,
            ']' => {
                *depth -= 1;
                if *depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split raw MDX source into source nodes and text directive nodes.
///
/// Code spans, `{...}` expressions and JSX tags are copied through without
/// looking for directives.
pub(crate) fn split_source(source: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let bytes = source.as_bytes();
    let mut copied = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'`' => pos = skip_code_span(source, pos),
            b'{' => pos = skip_expression(source, pos),
            b'<' if bytes.get(pos + 1).is_some_and(|b| b.is_ascii_alphabetic() || *b == b'/') => {
                pos = source[pos..].find('>').map_or(bytes.len(), |end| pos + end + 1);
            }
            b':' => {
                if let Some((ParsedDirective::Text { directive, label }, end)) =
                    text_directive_at(source, pos)
                {
                    if pos > copied {
                        nodes.push(Node::source(&source[copied..pos]));
                    }
                    nodes.push(text_directive(
                        directive,
                        (!label.is_empty()).then(|| Node::source(label)),
                    ));
                    copied = end;
                    pos = end;
                } else {
                    pos += 1;
                }
            }
            _ => pos += 1,
        }
    }

    if copied < source.len() {
        nodes.push(Node::source(&source[copied..]));
    }
    nodes
}

fn text_directive(directive: Directive, label: Option<Node>) -> Node {
    labelled_text_directive(directive, label.into_iter().collect())
}

/// Text directive node with its label nodes as children.
pub(crate) fn labelled_text_directive(directive: Directive, label: Vec<Node>) -> Node {
    Node::new(NodeKind::TextDirective(directive)).with_children(label)
}

/// Skip a backtick code span starting at `start`.
///
/// An unmatched backtick run is skipped on its own.
fn skip_code_span(source: &str, start: usize) -> usize {
    let run = source[start..].bytes().take_while(|&b| b == b'`').count();
    let open_end = start + run;
    let mut search = open_end;

    while let Some(offset) = source[search..].find('`') {
        let candidate = search + offset;
        let len = source[candidate..].bytes().take_while(|&b| b == b'`').count();
        if len == run {
            return candidate + len;
        }
        search = candidate + len;
    }

    open_end
}

/// Skip a balanced `{...}` expression starting at `start`.
fn skip_expression(source: &str, start: usize) -> usize {
    let mut depth = 0usize;
    for (i, b) in source.bytes().enumerate().skip(start) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
    }
    source.len()
}
