//! Syntax tree produced by [`TreeParser`](crate::TreeParser).
//!
//! The tree mirrors the Markdown document structure closely enough for the
//! tree passes to work on it: directive nodes carry their name and attributes,
//! Markdown structure is kept as owned pulldown-cmark tags and events, and
//! MDX documents keep their non-directive text as raw source.

use std::collections::BTreeMap;

use pulldown_cmark::{Event, Tag};

/// Directive attributes as written in `{...}`.
///
/// `#id` is stored under `id`, `.class` entries are joined under `class`,
/// bare keys have an empty value.
pub type Attributes = BTreeMap<String, String>;

/// A parsed directive: `:name`, `::name` or `:::name`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directive {
    /// Directive identifier (e.g. `info`, `warning`).
    pub name: String,
    /// Attributes from the `{...}` block.
    pub attributes: Attributes,
}

impl Directive {
    /// Create a directive without attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Fenced or indented code block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeBlock {
    /// First word of the fence info string.
    pub lang: Option<String>,
    /// Code content, including the trailing newline.
    pub value: String,
}

/// Code block already converted to highlighted markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightedCode {
    /// Language the code was highlighted as.
    pub lang: String,
    /// Highlighted inner HTML (token spans, no `<pre>`/`<code>` wrapper).
    pub html: String,
}

/// Output element hints attached by tree passes.
///
/// Compilers use these to decide which element a node becomes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderHints {
    /// Output element name.
    pub tag_name: String,
    /// Output element properties.
    pub properties: BTreeMap<String, String>,
}

/// Node kind.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Document root.
    Root,
    /// Inline directive: `:name[label]{attrs}`.
    TextDirective(Directive),
    /// Block leaf directive: `::name[label]{attrs}`.
    LeafDirective(Directive),
    /// Block container directive: `:::name` ... `:::`.
    ContainerDirective(Directive),
    /// Markdown structure (paragraph, heading, list, emphasis, link, ...).
    Element(Tag<'static>),
    /// Markdown leaf event (text, inline code, raw HTML, breaks, rules).
    Event(Event<'static>),
    /// Code block.
    Code(CodeBlock),
    /// Highlighted code block.
    Highlighted(HighlightedCode),
    /// Raw MDX source handed to the MDX compiler unchanged.
    Source(String),
}

/// Syntax tree node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    /// Render hints, set by tree passes such as the admonition mapper.
    pub data: Option<RenderHints>,
}

impl Node {
    /// Create a node without children.
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            data: None,
        }
    }

    /// Create a root node.
    #[must_use]
    pub fn root(children: Vec<Node>) -> Self {
        Self::new(NodeKind::Root).with_children(children)
    }

    /// Create a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self::new(NodeKind::Event(Event::Text(text.into())))
    }

    /// Create a raw source node.
    #[must_use]
    pub fn source(source: impl Into<String>) -> Self {
        Self::new(NodeKind::Source(source.into()))
    }

    /// Replace the children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// The directive carried by this node, if it is a directive node.
    #[must_use]
    pub fn directive(&self) -> Option<&Directive> {
        match &self.kind {
            NodeKind::TextDirective(d)
            | NodeKind::LeafDirective(d)
            | NodeKind::ContainerDirective(d) => Some(d),
            _ => None,
        }
    }

    /// Visit every node in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Visit every node in pre-order, allowing mutation.
    ///
    /// Children are visited after the parent callback returns, so a callback
    /// that replaces `children` sees its replacement walked.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Collect the plain text below this node.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| match &node.kind {
            NodeKind::Event(Event::Text(text) | Event::Code(text)) => out.push_str(text),
            NodeKind::Source(source) => out.push_str(source),
            NodeKind::Code(code) => out.push_str(&code.value),
            _ => {}
        });
        out
    }
}
