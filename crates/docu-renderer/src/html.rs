//! Tree to HTML serialization.
//!
//! The tree is flattened back into pulldown-cmark events and written with
//! [`pulldown_cmark::html::push_html`]. Directive nodes become raw HTML
//! around their children, using the element their render hints name.

use std::fmt::Write;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};

use crate::error::RenderError;
use crate::pipeline::Compiler;
use crate::tree::{HighlightedCode, Node, NodeKind, RenderHints};
use crate::util::escape_html;

/// Compiler producing an HTML fragment.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlCompiler;

impl HtmlCompiler {
    /// Create the compiler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Compiler for HtmlCompiler {
    fn name(&self) -> &'static str {
        "html"
    }

    fn compile(&self, tree: &Node) -> Result<String, RenderError> {
        Ok(to_html(tree))
    }
}

/// Serialize a tree to HTML.
#[must_use]
pub fn to_html(tree: &Node) -> String {
    let mut events = Vec::new();
    push_events(tree, &mut events);

    let mut html = String::with_capacity(4096);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    html
}

fn push_events<'a>(node: &'a Node, events: &mut Vec<Event<'a>>) {
    match &node.kind {
        NodeKind::Root => push_children(node, events),
        NodeKind::Element(tag) => {
            events.push(Event::Start(tag.clone()));
            push_children(node, events);
            events.push(Event::End(tag.to_end()));
        }
        NodeKind::Event(event) => events.push(event.clone()),
        NodeKind::Code(code) => {
            let lang = code.lang.as_deref().unwrap_or_default();
            events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(
                CowStr::Borrowed(lang),
            ))));
            events.push(Event::Text(CowStr::Borrowed(&code.value)));
            events.push(Event::End(TagEnd::CodeBlock));
        }
        NodeKind::Highlighted(code) => events.push(Event::Html(highlighted_html(code).into())),
        NodeKind::Source(source) => events.push(Event::Html(CowStr::Borrowed(source))),
        NodeKind::TextDirective(_) => {
            let (open, close) = directive_tags(node.data.as_ref());
            events.push(Event::InlineHtml(open.into()));
            push_children(node, events);
            events.push(Event::InlineHtml(close.into()));
        }
        NodeKind::LeafDirective(_) => {
            let (open, close) = directive_tags(node.data.as_ref());
            events.push(Event::Html(open.into()));
            push_children(node, events);
            events.push(Event::Html(format!("{close}\n").into()));
        }
        NodeKind::ContainerDirective(_) => {
            let (open, close) = directive_tags(node.data.as_ref());
            events.push(Event::Html(format!("{open}\n").into()));
            push_children(node, events);
            events.push(Event::Html(format!("{close}\n").into()));
        }
    }
}

fn push_children<'a>(node: &'a Node, events: &mut Vec<Event<'a>>) {
    for child in &node.children {
        push_events(child, events);
    }
}

/// Opening and closing tags for a directive node.
fn directive_tags(hints: Option<&RenderHints>) -> (String, String) {
    let Some(hints) = hints else {
        return ("<div>".to_owned(), "</div>".to_owned());
    };

    let mut open = format!("<{}", hints.tag_name);
    for (key, value) in &hints.properties {
        write!(open, r#" {key}="{}""#, escape_html(value)).unwrap();
    }
    open.push('>');

    (open, format!("</{}>", hints.tag_name))
}

fn highlighted_html(code: &HighlightedCode) -> String {
    format!(
        "<pre class=\"code\"><code class=\"language-{}\">{}</code></pre>\n",
        escape_html(&code.lang),
        code.html
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::admonition::render_hints;
    use crate::tree::{CodeBlock, Directive};

    fn admonition(kind: fn(Directive) -> NodeKind, id: &str, children: Vec<Node>) -> Node {
        let directive = Directive::new("info").with_attribute("id", id);
        let hints = render_hints(&directive);
        let mut node = Node::new(kind(directive)).with_children(children);
        node.data = Some(hints);
        node
    }

    fn paragraph(text: &str) -> Node {
        Node::new(NodeKind::Element(Tag::Paragraph)).with_children(vec![Node::text(text)])
    }

    #[test]
    fn test_container_directive() {
        let tree = Node::root(vec![admonition(
            NodeKind::ContainerDirective,
            "tip",
            vec![paragraph("Hello")],
        )]);
        assert_eq!(
            to_html(&tree),
            "<div class=\"theme-admonition alert alert-tip\">\n<p>Hello</p>\n</div>\n"
        );
    }

    #[test]
    fn test_text_directive() {
        let tree = Node::root(vec![
            Node::new(NodeKind::Element(Tag::Paragraph)).with_children(vec![
                Node::text("Press "),
                admonition(NodeKind::TextDirective, "key", vec![Node::text("Enter")]),
            ]),
        ]);
        assert_eq!(
            to_html(&tree),
            "<p>Press <div class=\"theme-admonition alert alert-key\">Enter</div></p>\n"
        );
    }

    #[test]
    fn test_leaf_directive() {
        let tree = Node::root(vec![admonition(
            NodeKind::LeafDirective,
            "video",
            vec![Node::text("Intro")],
        )]);
        assert_eq!(
            to_html(&tree),
            "<div class=\"theme-admonition alert alert-video\">Intro</div>\n"
        );
    }

    #[test]
    fn test_directive_without_hints_is_bare_div() {
        let tree = Node::root(vec![
            Node::new(NodeKind::ContainerDirective(Directive::new("info")))
                .with_children(vec![paragraph("x")]),
        ]);
        assert_eq!(to_html(&tree), "<div>\n<p>x</p>\n</div>\n");
    }

    #[test]
    fn test_plain_code_block() {
        let tree = Node::root(vec![Node::new(NodeKind::Code(CodeBlock {
            lang: Some("text".to_owned()),
            value: "a < b\n".to_owned(),
        }))]);
        assert_eq!(
            to_html(&tree),
            "<pre><code class=\"language-text\">a &lt; b\n</code></pre>\n"
        );
    }

    #[test]
    fn test_highlighted_code_block() {
        let tree = Node::root(vec![Node::new(NodeKind::Highlighted(HighlightedCode {
            lang: "rust".to_owned(),
            html: "<span class=\"source rust\">x</span>".to_owned(),
        }))]);
        assert_eq!(
            to_html(&tree),
            "<pre class=\"code\"><code class=\"language-rust\"><span class=\"source rust\">x</span></code></pre>\n"
        );
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let (open, close) = directive_tags(Some(&RenderHints {
            tag_name: "div".to_owned(),
            properties: [("class".to_owned(), "a\"b".to_owned())].into(),
        }));
        assert_eq!(open, "<div class=\"a&quot;b\">");
        assert_eq!(close, "</div>");
    }
}
