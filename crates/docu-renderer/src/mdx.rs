//! Tree to compiled MDX component.
//!
//! MDX documents keep their ordinary content as raw source, so compiling
//! means writing the tree back out as MDX (directive nodes as JSX elements,
//! highlighted code as pre-rendered markup) and handing the result to
//! `mdxjs`, which produces the JavaScript module.

use std::fmt::Write;

use crate::error::RenderError;
use crate::pipeline::Compiler;
use crate::tree::{CodeBlock, HighlightedCode, Node, NodeKind, RenderHints};
use crate::util::escape_html;

/// Compiler producing a JavaScript module from an MDX tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct MdxCompiler;

impl MdxCompiler {
    /// Create the compiler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Compiler for MdxCompiler {
    fn name(&self) -> &'static str {
        "mdx"
    }

    fn compile(&self, tree: &Node) -> Result<String, RenderError> {
        let source = to_mdx(tree)?;
        mdxjs::compile(&source, &mdxjs::Options::default())
            .map_err(|e| RenderError::Mdx(e.to_string()))
    }
}

/// Write a tree back out as MDX source.
pub fn to_mdx(tree: &Node) -> Result<String, RenderError> {
    let mut out = String::with_capacity(4096);
    write_node(tree, &mut out)?;
    Ok(out)
}

fn write_node(node: &Node, out: &mut String) -> Result<(), RenderError> {
    match &node.kind {
        NodeKind::Root => write_children(node, out)?,
        NodeKind::Source(source) => out.push_str(source),
        NodeKind::Code(code) => write_code(code, out),
        NodeKind::Highlighted(code) => write_highlighted(code, out)?,
        NodeKind::TextDirective(_) => {
            let (open, close) = jsx_tags(node.data.as_ref());
            out.push_str(&open);
            write_children(node, out)?;
            out.push_str(&close);
        }
        NodeKind::LeafDirective(_) => {
            let (open, close) = jsx_tags(node.data.as_ref());
            out.push_str(&open);
            write_children(node, out)?;
            out.push_str(&close);
            out.push_str("\n\n");
        }
        NodeKind::ContainerDirective(_) => {
            let (open, close) = jsx_tags(node.data.as_ref());
            out.push_str(&open);
            out.push_str("\n\n");
            write_children(node, out)?;
            if !out.ends_with('\n') {
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&close);
            out.push_str("\n\n");
        }
        NodeKind::Element(_) | NodeKind::Event(_) => {
            tracing::warn!(kind = ?node.kind, "Skipping Markdown node in MDX output");
        }
    }
    Ok(())
}

fn write_children(node: &Node, out: &mut String) -> Result<(), RenderError> {
    for child in &node.children {
        write_node(child, out)?;
    }
    Ok(())
}

/// Fenced code, with a fence longer than any backtick run in the code.
fn write_code(code: &CodeBlock, out: &mut String) {
    let longest_run = code
        .value
        .split(|c: char| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat((longest_run + 1).max(3));

    out.push_str(&fence);
    out.push_str(code.lang.as_deref().unwrap_or_default());
    out.push('\n');
    out.push_str(&code.value);
    if !code.value.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&fence);
    out.push('\n');
}

fn write_highlighted(code: &HighlightedCode, out: &mut String) -> Result<(), RenderError> {
    let html = serde_json::to_string(&code.html).map_err(|e| RenderError::Stage {
        stage: "mdx",
        message: e.to_string(),
    })?;
    write!(
        out,
        "<pre className=\"code\"><code className=\"language-{}\" dangerouslySetInnerHTML={{{{__html: {html}}}}} /></pre>\n\n",
        escape_html(&code.lang)
    )
    .unwrap();
    Ok(())
}

/// Opening and closing JSX tags for a directive node.
fn jsx_tags(hints: Option<&RenderHints>) -> (String, String) {
    let Some(hints) = hints else {
        return ("<div>".to_owned(), "</div>".to_owned());
    };

    let mut open = format!("<{}", hints.tag_name);
    for (key, value) in &hints.properties {
        let key = match key.as_str() {
            "class" => "className",
            other => other,
        };
        write!(open, r#" {key}="{}""#, escape_html(value)).unwrap();
    }
    open.push('>');

    (open, format!("</{}>", hints.tag_name))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::admonition::render_hints;
    use crate::tree::Directive;

    fn tip(children: Vec<Node>) -> Node {
        let directive = Directive::new("info").with_attribute("id", "tip");
        let hints = render_hints(&directive);
        let mut node = Node::new(NodeKind::ContainerDirective(directive)).with_children(children);
        node.data = Some(hints);
        node
    }

    #[test]
    fn test_container_as_jsx() {
        let tree = Node::root(vec![
            Node::source("# Title\n\n"),
            tip(vec![Node::source("Hello\n")]),
            Node::source("After\n"),
        ]);
        assert_eq!(
            to_mdx(&tree).unwrap(),
            "# Title\n\n<div className=\"theme-admonition alert alert-tip\">\n\nHello\n\n</div>\n\nAfter\n"
        );
    }

    #[test]
    fn test_code_fence_outgrows_content() {
        let mut out = String::new();
        write_code(
            &CodeBlock {
                lang: Some("md".to_owned()),
                value: "````\nx\n````".to_owned(),
            },
            &mut out,
        );
        assert_eq!(out, "`````md\n````\nx\n````\n`````\n");
    }

    #[test]
    fn test_highlighted_code_is_json_string() {
        let tree = Node::root(vec![Node::new(NodeKind::Highlighted(HighlightedCode {
            lang: "rust".to_owned(),
            html: "<span class=\"x\">{}</span>".to_owned(),
        }))]);
        assert_eq!(
            to_mdx(&tree).unwrap(),
            "<pre className=\"code\"><code className=\"language-rust\" dangerouslySetInnerHTML={{__html: \"<span class=\\\"x\\\">{}</span>\"}} /></pre>\n\n"
        );
    }

    #[test]
    fn test_compile_produces_component() {
        let tree = Node::root(vec![tip(vec![Node::source("Hello\n")])]);
        let output = MdxCompiler::new().compile(&tree).unwrap();

        assert!(output.contains("_createMdxContent"));
        assert!(output.contains("theme-admonition alert alert-tip"));
        assert!(output.contains("Hello"));
    }

    #[test]
    fn test_compile_error() {
        let tree = Node::root(vec![Node::source("<div>\n")]);
        let err = MdxCompiler::new().compile(&tree).unwrap_err();
        assert!(matches!(err, RenderError::Mdx(_)));
    }
}
