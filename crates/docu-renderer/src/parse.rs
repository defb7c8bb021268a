//! Source text to syntax tree.
//!
//! - [`TreeParser::markdown`] runs pulldown-cmark once over the whole
//!   document. Block directive lines are swapped for marker comments first
//!   and rebuilt into directive nodes from the event stream, so directives
//!   nest inside lists and blockquotes and reference links resolve across
//!   them.
//! - [`TreeParser::mdx`] segments block directives first and keeps the text
//!   between them as raw [`NodeKind::Source`] for the MDX compiler, splitting
//!   out only fenced code and inline directives.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::mem;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::directive::block::{Block, split_blocks};
use crate::directive::marker::{BlockMarker, mark_block_directives, marker_index, restore_markers};
use crate::directive::{FenceLine, FenceTracker, inline, parse_attribute_block};
use crate::tree::{CodeBlock, Directive, Node, NodeKind};

/// Source format understood by a [`TreeParser`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flavor {
    Markdown,
    Mdx,
}

/// Parses source text into a [`Node`] tree, including directive syntax.
///
/// The Markdown flavor also drops top-level `import`/`export` blocks.
#[derive(Clone, Debug)]
pub struct TreeParser {
    flavor: Flavor,
    gfm: bool,
}

impl TreeParser {
    /// Markdown parser with the MDX syntax extension enabled.
    #[must_use]
    pub fn markdown(gfm: bool) -> Self {
        Self {
            flavor: Flavor::Markdown,
            gfm,
        }
    }

    /// MDX source parser.
    #[must_use]
    pub fn mdx() -> Self {
        Self {
            flavor: Flavor::Mdx,
            gfm: false,
        }
    }

    /// Names of the stages this parser performs, in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        match self.flavor {
            Flavor::Markdown => vec!["markdown", "mdx-syntax", "directive"],
            Flavor::Mdx => vec!["mdx-source", "directive"],
        }
    }

    /// Parse a document into a tree.
    #[must_use]
    pub fn parse(&self, source: &str) -> Node {
        match self.flavor {
            Flavor::Markdown => Node::root(split_text_directives(
                self.build_markdown(&strip_esm(source)),
            )),
            Flavor::Mdx => Node::root(convert_mdx_blocks(split_blocks(source))),
        }
    }

    /// Parse a label as inline content, unwrapping the paragraph.
    fn parse_inline(&self, label: &str) -> Vec<Node> {
        let mut nodes = self.build_markdown(label);
        if nodes.len() == 1 && matches!(nodes[0].kind, NodeKind::Element(Tag::Paragraph)) {
            return mem::take(&mut nodes[0].children);
        }
        nodes
    }

    fn options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        }
    }

    /// Build Markdown nodes from a single pulldown-cmark pass.
    ///
    /// Inline directives are left in the text; [`split_text_directives`]
    /// runs once over the finished tree.
    fn build_markdown(&self, text: &str) -> Vec<Node> {
        let (marked, markers) = mark_block_directives(text);
        let mut builder = TreeBuilder::new(self, &markers);
        for event in Parser::new_ext(&marked, self.options()) {
            builder.push(event);
        }
        builder.finish()
    }
}

/// Assembles nodes from pulldown-cmark events.
///
/// Marker HTML blocks become directive nodes. A container stays open until
/// its closing fence or until the element it was opened in ends.
struct TreeBuilder<'a> {
    parser: &'a TreeParser,
    markers: &'a [BlockMarker],
    current: Node,
    parents: Vec<Node>,
    /// Open containers: depth in `parents` and fence colon count.
    containers: Vec<(usize, usize)>,
    /// Colon counts of containers closed by their enclosing element.
    dangling: Vec<usize>,
    code: Option<CodeBlock>,
    html: Option<String>,
}

impl<'a> TreeBuilder<'a> {
    fn new(parser: &'a TreeParser, markers: &'a [BlockMarker]) -> Self {
        Self {
            parser,
            markers,
            current: Node::root(Vec::new()),
            parents: Vec::new(),
            containers: Vec::new(),
            dangling: Vec::new(),
            code: None,
            html: None,
        }
    }

    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                self.code = Some(CodeBlock {
                    lang: code_lang(&kind),
                    value: String::new(),
                });
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = self.code.take() {
                    self.push_node(Node::new(NodeKind::Code(block)));
                }
            }
            Event::Start(Tag::HtmlBlock) => self.html = Some(String::new()),
            Event::End(TagEnd::HtmlBlock) => {
                if let Some(html) = self.html.take() {
                    self.html_block(&html);
                }
            }
            Event::Html(html) => match self.html.as_mut() {
                Some(block) => block.push_str(&html),
                None => {
                    let html = self.restore(&html);
                    self.push_node(Node::new(NodeKind::Event(Event::Html(html.into()))));
                }
            },
            Event::Text(text) => {
                let text = self.restore(&text);
                match self.code.as_mut() {
                    Some(block) => block.value.push_str(&text),
                    None => self.push_node(Node::text(text)),
                }
            }
            Event::Code(code) => {
                let code = self.restore(&code);
                self.push_node(Node::new(NodeKind::Event(Event::Code(code.into()))));
            }
            Event::InlineHtml(html) => {
                let restored = self.restore(&html);
                let node = if marker_index(&html).is_some() {
                    Node::text(restored)
                } else {
                    Node::new(NodeKind::Event(Event::InlineHtml(restored.into())))
                };
                self.push_node(node);
            }
            Event::Start(tag) => self.open(Node::new(NodeKind::Element(tag.into_static()))),
            Event::End(_) => {
                self.close_containers();
                self.close();
            }
            other => self.push_node(Node::new(NodeKind::Event(other.into_static()))),
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while !self.parents.is_empty() {
            self.close();
        }
        self.current.children
    }

    fn html_block(&mut self, html: &str) {
        let markers = self.markers;
        match marker_index(html).and_then(|index| markers.get(index)) {
            Some(marker) => self.directive_marker(marker),
            None => {
                let html = self.restore(html);
                let event = Node::new(NodeKind::Event(Event::Html(html.into())));
                self.push_node(
                    Node::new(NodeKind::Element(Tag::HtmlBlock)).with_children(vec![event]),
                );
            }
        }
    }

    fn directive_marker(&mut self, marker: &'a BlockMarker) {
        match marker {
            BlockMarker::Open {
                directive,
                label,
                colon_count,
                ..
            } => {
                let label = if label.is_empty() {
                    Vec::new()
                } else {
                    self.parser.build_markdown(label)
                };
                self.open(
                    Node::new(NodeKind::ContainerDirective(directive.clone())).with_children(label),
                );
                self.containers.push((self.parents.len(), *colon_count));
            }
            BlockMarker::Close { colon_count, line } => {
                let depth = self.parents.len();
                if self
                    .containers
                    .last()
                    .is_some_and(|&(open_depth, count)| open_depth == depth && *colon_count >= count)
                {
                    self.containers.pop();
                    self.close();
                } else if self.dangling.last().is_some_and(|&count| *colon_count >= count) {
                    self.dangling.pop();
                } else {
                    self.push_node(
                        Node::new(NodeKind::Element(Tag::Paragraph))
                            .with_children(vec![Node::text(line.as_str())]),
                    );
                }
            }
            BlockMarker::Leaf {
                directive, label, ..
            } => {
                let node = Node::new(NodeKind::LeafDirective(directive.clone()))
                    .with_children(self.parser.parse_inline(label));
                self.push_node(node);
            }
        }
    }

    /// Close containers opened directly inside the current element.
    fn close_containers(&mut self) {
        while let Some(&(depth, count)) = self.containers.last() {
            if depth != self.parents.len() {
                break;
            }
            self.containers.pop();
            self.dangling.push(count);
            self.close();
        }
    }

    fn open(&mut self, node: Node) {
        let parent = mem::replace(&mut self.current, node);
        self.parents.push(parent);
    }

    fn close(&mut self) {
        if let Some(parent) = self.parents.pop() {
            let node = mem::replace(&mut self.current, parent);
            self.current.children.push(node);
        }
    }

    fn push_node(&mut self, node: Node) {
        self.current.children.push(node);
    }

    fn restore(&self, text: &str) -> String {
        restore_markers(text, self.markers).into_owned()
    }
}

/// First word of a fenced code block's info string.
fn code_lang(kind: &CodeBlockKind<'_>) -> Option<String> {
    match kind {
        CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(str::to_owned),
        CodeBlockKind::Indented => None,
    }
}

/// Split inline directives out of text nodes, recursively.
///
/// Adjacent text nodes are merged first. A label that is still open at the
/// end of a text node is closed by a `]` in a later text sibling, and the
/// nodes in between become the directive's label.
fn split_text_directives(nodes: Vec<Node>) -> Vec<Node> {
    let mut queue = merge_text(nodes);
    let mut out = Vec::with_capacity(queue.len());

    while let Some(node) = queue.pop_front() {
        let Some(text) = text_of(&node) else {
            out.push(node);
            continue;
        };
        let (nodes, open) = inline::split_text(text);
        out.extend(nodes);

        let Some(open) = open else {
            continue;
        };
        if let Some(directive) = close_open_label(&open, &mut queue) {
            out.push(directive);
        } else {
            out.push(Node::text(format!(":{}[", open.name)));
            if !open.label.is_empty() {
                queue.push_front(Node::text(open.label));
            }
        }
    }

    out
}

/// Merge adjacent text nodes and split the children of everything else.
fn merge_text(nodes: Vec<Node>) -> VecDeque<Node> {
    let mut merged = VecDeque::with_capacity(nodes.len());
    let mut pending = String::new();

    for mut node in nodes {
        if let Some(text) = text_of(&node) {
            pending.push_str(text);
            continue;
        }
        if !pending.is_empty() {
            merged.push_back(Node::text(mem::take(&mut pending)));
        }
        node.children = split_text_directives(mem::take(&mut node.children));
        merged.push_back(node);
    }

    if !pending.is_empty() {
        merged.push_back(Node::text(pending));
    }
    merged
}

/// Find the `]` closing `open` in the following siblings and build the
/// directive node, leaving any text after `]{attrs}` at the queue front.
fn close_open_label(open: &inline::OpenLabel, queue: &mut VecDeque<Node>) -> Option<Node> {
    let mut depth = open.depth;
    let (index, close) = queue.iter().enumerate().find_map(|(index, node)| {
        text_of(node)
            .and_then(|text| inline::label_close(text, &mut depth))
            .map(|close| (index, close))
    })?;

    let mut label = Vec::new();
    if !open.label.is_empty() {
        label.push(Node::text(open.label.as_str()));
    }
    label.extend(queue.drain(..index));

    let closing = queue.pop_front()?;
    let text = text_of(&closing)?;
    if close > 0 {
        label.push(Node::text(&text[..close]));
    }
    let after = &text[close + 1..];
    let (attributes, consumed) = parse_attribute_block(after);
    if consumed < after.len() {
        queue.push_front(Node::text(&after[consumed..]));
    }

    let directive = Directive {
        name: open.name.clone(),
        attributes,
    };
    Some(inline::labelled_text_directive(directive, label))
}

fn text_of(node: &Node) -> Option<&str> {
    match &node.kind {
        NodeKind::Event(Event::Text(text)) => Some(text),
        _ => None,
    }
}

/// Convert MDX blocks to nodes.
fn convert_mdx_blocks(blocks: Vec<Block>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for block in blocks {
        match block {
            Block::Text(text) => nodes.extend(split_mdx_source(&text)),
            Block::Leaf { directive, label } => nodes.push(
                Node::new(NodeKind::LeafDirective(directive))
                    .with_children(inline::split_source(&label)),
            ),
            Block::Container {
                directive,
                label,
                children,
            } => {
                // A container label becomes a leading paragraph.
                let mut content = Vec::new();
                if !label.is_empty() {
                    content.push(Node::source(format!("{label}\n\n")));
                }
                content.extend(convert_mdx_blocks(children));
                nodes.push(Node::new(NodeKind::ContainerDirective(directive)).with_children(content));
            }
        }
    }
    nodes
}

/// Split MDX source into source runs and fenced code blocks.
fn split_mdx_source(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut fence = FenceTracker::new();
    let mut source = String::new();
    let mut code: Option<CodeBlock> = None;

    for line in text.split_inclusive('\n') {
        match fence.update(line) {
            FenceLine::Open(info) => {
                flush_source(&mut source, &mut nodes);
                code = Some(CodeBlock {
                    lang: info.split_whitespace().next().map(str::to_owned),
                    value: String::new(),
                });
            }
            FenceLine::Close => {
                if let Some(block) = code.take() {
                    nodes.push(Node::new(NodeKind::Code(block)));
                }
            }
            FenceLine::Inside => {
                if let Some(block) = code.as_mut() {
                    block.value.push_str(line);
                }
            }
            FenceLine::Outside => source.push_str(line),
        }
    }

    if let Some(block) = code.take() {
        nodes.push(Node::new(NodeKind::Code(block)));
    }
    flush_source(&mut source, &mut nodes);
    nodes
}

fn flush_source(source: &mut String, nodes: &mut Vec<Node>) {
    if !source.is_empty() {
        nodes.extend(inline::split_source(&mem::take(source)));
    }
}

/// Drop top-level ESM blocks (`import`/`export` paragraphs).
fn strip_esm(source: &str) -> Cow<'_, str> {
    let mut fence = FenceTracker::new();
    let mut out = String::with_capacity(source.len());
    let mut at_block_start = true;
    let mut in_esm = false;
    let mut stripped = false;

    for line in source.split_inclusive('\n') {
        let blank = line.trim().is_empty();
        if in_esm {
            if !blank {
                continue;
            }
            in_esm = false;
        } else if fence.update(line) == FenceLine::Outside && at_block_start && is_esm(line) {
            in_esm = true;
            stripped = true;
            continue;
        }
        at_block_start = blank;
        out.push_str(line);
    }

    if stripped {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(source)
    }
}

fn is_esm(line: &str) -> bool {
    ["import", "export"].iter().any(|keyword| {
        line.strip_prefix(keyword)
            .is_some_and(|rest| rest.starts_with([' ', '\t', '{', '*']))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn directive_names(node: &Node) -> Vec<String> {
        let mut names = Vec::new();
        node.walk(&mut |n| {
            if let Some(d) = n.directive() {
                names.push(d.name.clone());
            }
        });
        names
    }

    #[test]
    fn test_markdown_paragraph() {
        let tree = TreeParser::markdown(true).parse("Hello *world*\n");
        assert_eq!(tree.children.len(), 1);
        assert!(matches!(tree.children[0].kind, NodeKind::Element(Tag::Paragraph)));
        assert_eq!(tree.text_content(), "Hello world");
    }

    #[test]
    fn test_markdown_container_directive() {
        let tree = TreeParser::markdown(true).parse(":::info{#tip}\nHello\n:::\n");
        assert_eq!(tree.children.len(), 1);

        let container = &tree.children[0];
        let NodeKind::ContainerDirective(directive) = &container.kind else {
            panic!("expected container, got {:?}", container.kind);
        };
        assert_eq!(directive.name, "info");
        assert_eq!(directive.attributes.get("id").map(String::as_str), Some("tip"));
        assert!(matches!(
            container.children[0].kind,
            NodeKind::Element(Tag::Paragraph)
        ));
        assert_eq!(container.text_content(), "Hello");
    }

    #[test]
    fn test_container_label_is_leading_paragraph() {
        let tree = TreeParser::markdown(true).parse(":::note[Heads up]\nBody\n:::\n");
        let container = &tree.children[0];
        assert_eq!(container.children.len(), 2);
        assert_eq!(container.children[0].text_content(), "Heads up");
        assert_eq!(container.children[1].text_content(), "Body");
    }

    #[test]
    fn test_leaf_directive_label_is_inline() {
        let tree = TreeParser::markdown(true).parse("::video[*Intro*]{#v}\n");
        let leaf = &tree.children[0];
        assert!(matches!(leaf.kind, NodeKind::LeafDirective(_)));
        assert!(matches!(
            leaf.children[0].kind,
            NodeKind::Element(Tag::Emphasis)
        ));
    }

    #[test]
    fn test_text_directive_in_paragraph() {
        let tree = TreeParser::markdown(true).parse("Press :kbd[Ctrl]{#key} now\n");
        assert_eq!(directive_names(&tree), vec!["kbd"]);
    }

    #[test]
    fn test_text_directive_not_in_inline_code() {
        let tree = TreeParser::markdown(true).parse("Use `:kbd[x]` literally\n");
        assert!(directive_names(&tree).is_empty());
    }

    #[test]
    fn test_code_block_becomes_code_node() {
        let tree = TreeParser::markdown(true).parse("```rust title=\"x\"\nfn main() {}\n```\n");
        assert_eq!(
            tree.children[0].kind,
            NodeKind::Code(CodeBlock {
                lang: Some("rust".to_owned()),
                value: "fn main() {}\n".to_owned(),
            })
        );
    }

    #[test]
    fn test_nested_containers() {
        let tree = TreeParser::markdown(true)
            .parse("::::info{#outer}\n:::info{#inner}\nx\n:::\n::::\n");
        assert_eq!(directive_names(&tree), vec!["info", "info"]);
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn test_reference_definition_after_container() {
        let tree = TreeParser::markdown(true)
            .parse("See [docs][d].\n\n:::info{#tip}\nx\n:::\n\n[d]: https://example.com\n");
        let mut links = Vec::new();
        tree.walk(&mut |node| {
            if let NodeKind::Element(Tag::Link { dest_url, .. }) = &node.kind {
                links.push((dest_url.to_string(), node.text_content()));
            }
        });
        assert_eq!(links, vec![("https://example.com".to_owned(), "docs".to_owned())]);
        assert!(!tree.text_content().contains("[d]"));
    }

    #[test]
    fn test_container_inside_list_item() {
        let tree = TreeParser::markdown(true)
            .parse("- item\n\n  :::info{#tip}\n  inside\n  :::\n- next\n");
        assert_eq!(tree.children.len(), 1);

        let list = &tree.children[0];
        assert!(matches!(list.kind, NodeKind::Element(Tag::List(None))));
        assert_eq!(list.children.len(), 2);
        let first_item = &list.children[0];
        let container = first_item
            .children
            .iter()
            .find(|node| matches!(node.kind, NodeKind::ContainerDirective(_)))
            .unwrap();
        assert_eq!(container.text_content(), "inside");
        assert_eq!(list.children[1].text_content(), "next");
    }

    #[test]
    fn test_container_inside_blockquote() {
        let tree = TreeParser::markdown(true).parse("> :::info{#tip}\n> quoted\n> :::\n");
        let quote = &tree.children[0];
        assert!(matches!(quote.kind, NodeKind::Element(Tag::BlockQuote(_))));
        assert_eq!(directive_names(quote), vec!["info"]);
        assert_eq!(quote.children[0].text_content(), "quoted");
    }

    #[test]
    fn test_container_closed_with_its_list_item() {
        let tree = TreeParser::markdown(true)
            .parse("- a\n\n  :::info{#tip}\n  x\n\n:::\n\nafter\n");
        assert_eq!(tree.children.len(), 2);
        assert_eq!(directive_names(&tree.children[0]), vec!["info"]);
        assert_eq!(tree.children[1].text_content(), "after");
    }

    #[test]
    fn test_unmatched_close_fence_is_text() {
        let tree = TreeParser::markdown(true).parse(":::\ntext\n");
        assert!(directive_names(&tree).is_empty());
        assert_eq!(tree.text_content(), ":::text");
    }

    #[test]
    fn test_directive_line_in_indented_code_is_kept() {
        let tree = TreeParser::markdown(true).parse("    :::info{#tip}\n    x\n");
        assert_eq!(
            tree.children[0].kind,
            NodeKind::Code(CodeBlock {
                lang: None,
                value: ":::info{#tip}\nx\n".to_owned(),
            })
        );
    }

    #[test]
    fn test_text_directive_label_with_emphasis() {
        let tree = TreeParser::markdown(true).parse("See :abbr[**HTML**]{#term} now\n");
        let paragraph = &tree.children[0];
        assert_eq!(paragraph.children.len(), 3);
        assert_eq!(paragraph.children[0], Node::text("See "));
        assert_eq!(paragraph.children[2], Node::text(" now"));

        let directive = &paragraph.children[1];
        let NodeKind::TextDirective(d) = &directive.kind else {
            panic!("expected text directive, got {:?}", directive.kind);
        };
        assert_eq!(d.name, "abbr");
        assert_eq!(d.attributes.get("id").map(String::as_str), Some("term"));
        assert!(matches!(
            directive.children[0].kind,
            NodeKind::Element(Tag::Strong)
        ));
        assert_eq!(directive.text_content(), "HTML");
    }

    #[test]
    fn test_text_directive_label_with_code_and_text() {
        let tree = TreeParser::markdown(true).parse("Run :kbd[press `q` now] please\n");
        let paragraph = &tree.children[0];
        let directive = &paragraph.children[1];
        assert!(matches!(directive.kind, NodeKind::TextDirective(_)));
        assert_eq!(directive.children.len(), 3);
        assert_eq!(directive.text_content(), "press q now");
        assert_eq!(paragraph.children[2], Node::text(" please"));
    }

    #[test]
    fn test_unclosed_label_stays_text() {
        let tree = TreeParser::markdown(true).parse("a :abbr[*b* and :kbd[C]\n");
        assert_eq!(directive_names(&tree), vec!["kbd"]);
        assert_eq!(tree.text_content(), "a :abbr[b and C");
    }

    #[test]
    fn test_mdx_syntax_strips_esm() {
        let source = "import X from './x'\nexport const a = 1\n\n# Title\n";
        let tree = TreeParser::markdown(true).parse(source);
        assert_eq!(tree.text_content(), "Title");
    }

    #[test]
    fn test_strip_esm_keeps_code_and_prose() {
        let source = "```js\n\nimport x from 'y'\n```\n\nimported goods\n";
        assert!(matches!(strip_esm(source), Cow::Borrowed(_)));
    }

    #[test]
    fn test_mdx_keeps_source() {
        let tree = TreeParser::mdx().parse("# Hi <Badge />\n\n:::info{#tip}\nBody\n:::\n");
        assert_eq!(tree.children[0].kind, NodeKind::Source("# Hi <Badge />\n\n".to_owned()));
        let container = &tree.children[1];
        assert!(matches!(container.kind, NodeKind::ContainerDirective(_)));
        assert_eq!(container.children, vec![Node::source("Body\n")]);
    }

    #[test]
    fn test_mdx_splits_fenced_code() {
        let tree = TreeParser::mdx().parse("Intro\n```js\nlet a = 1;\n```\nOutro\n");
        assert_eq!(
            tree.children,
            vec![
                Node::source("Intro\n"),
                Node::new(NodeKind::Code(CodeBlock {
                    lang: Some("js".to_owned()),
                    value: "let a = 1;\n".to_owned(),
                })),
                Node::source("Outro\n"),
            ]
        );
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(
            TreeParser::markdown(true).stage_names(),
            vec!["markdown", "mdx-syntax", "directive"]
        );
        assert_eq!(TreeParser::mdx().stage_names(), vec!["mdx-source", "directive"]);
    }
}
