//! Ordered rendering pipelines.
//!
//! A [`Pipeline`] runs four kinds of stages in a fixed order:
//!
//! 1. [`TextTransform`]s on the raw source,
//! 2. the [`TreeParser`],
//! 3. [`TreeTransform`]s on the parsed tree,
//! 4. a [`Compiler`] producing the output string.
//!
//! Text transforms can only run before parsing and tree transforms only after
//! it. [`Pipeline::stages`] lists every stage by name in execution order.

use std::borrow::Cow;

use crate::admonition::AdmonitionMapper;
use crate::error::RenderError;
use crate::highlight::Highlighter;
use crate::html::HtmlCompiler;
use crate::mdx::MdxCompiler;
use crate::parse::TreeParser;
use crate::shorthand::ShorthandRewriter;
use crate::tree::Node;

/// Stage operating on raw source text.
pub trait TextTransform: Send + Sync {
    /// Stage name.
    fn name(&self) -> &'static str;

    /// Transform the source, borrowing it when nothing changes.
    fn transform<'a>(&self, source: &'a str) -> Cow<'a, str>;
}

/// Stage operating on the parsed tree.
pub trait TreeTransform: Send + Sync {
    /// Stage name.
    fn name(&self) -> &'static str;

    /// Transform the tree in place.
    fn transform(&self, tree: &mut Node);
}

/// Final stage producing the output string.
pub trait Compiler: Send + Sync {
    /// Stage name.
    fn name(&self) -> &'static str;

    /// Compile the tree.
    fn compile(&self, tree: &Node) -> Result<String, RenderError>;
}

/// Options shared by the built-in pipelines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Enable GitHub Flavored Markdown (tables, strikethrough, task lists).
    pub gfm: bool,
    /// Enable syntax highlighting of code blocks.
    pub highlight: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            highlight: true,
        }
    }
}

/// An ordered sequence of rendering stages.
pub struct Pipeline {
    text_transforms: Vec<Box<dyn TextTransform>>,
    parser: TreeParser,
    tree_transforms: Vec<Box<dyn TreeTransform>>,
    compiler: Box<dyn Compiler>,
}

impl Pipeline {
    /// Create a pipeline with only a parser and a compiler.
    #[must_use]
    pub fn new(parser: TreeParser, compiler: impl Compiler + 'static) -> Self {
        Self {
            text_transforms: Vec::new(),
            parser,
            tree_transforms: Vec::new(),
            compiler: Box::new(compiler),
        }
    }

    /// Append a text transform (runs before parsing).
    #[must_use]
    pub fn with_text_transform(mut self, transform: impl TextTransform + 'static) -> Self {
        self.text_transforms.push(Box::new(transform));
        self
    }

    /// Append a tree transform (runs after parsing).
    #[must_use]
    pub fn with_tree_transform(mut self, transform: impl TreeTransform + 'static) -> Self {
        self.tree_transforms.push(Box::new(transform));
        self
    }

    /// Markdown to HTML.
    ///
    /// `shorthand → markdown → mdx-syntax → directive → admonition → highlight → html`
    #[must_use]
    pub fn markdown(options: &RenderOptions) -> Self {
        Self::new(TreeParser::markdown(options.gfm), HtmlCompiler::new())
            .with_standard_stages(options)
    }

    /// MDX to a compiled JavaScript component.
    ///
    /// `shorthand → mdx-source → directive → admonition → highlight → mdx`
    #[must_use]
    pub fn mdx(options: &RenderOptions) -> Self {
        Self::new(TreeParser::mdx(), MdxCompiler::new()).with_standard_stages(options)
    }

    fn with_standard_stages(self, options: &RenderOptions) -> Self {
        let pipeline = self
            .with_text_transform(ShorthandRewriter::new())
            .with_tree_transform(AdmonitionMapper::new());
        if options.highlight {
            pipeline.with_tree_transform(Highlighter::new())
        } else {
            pipeline
        }
    }

    /// Stage names in execution order.
    #[must_use]
    pub fn stages(&self) -> Vec<&'static str> {
        let mut stages: Vec<&'static str> =
            self.text_transforms.iter().map(|t| t.name()).collect();
        stages.extend(self.parser.stage_names());
        stages.extend(self.tree_transforms.iter().map(|t| t.name()));
        stages.push(self.compiler.name());
        stages
    }

    /// Run the text transforms and the parser, then the tree transforms.
    #[must_use]
    pub fn parse(&self, source: &str) -> Node {
        let mut text = Cow::Borrowed(source);
        for transform in &self.text_transforms {
            let rewritten = match transform.transform(&text) {
                Cow::Owned(rewritten) => Some(rewritten),
                Cow::Borrowed(_) => None,
            };
            if let Some(rewritten) = rewritten {
                text = Cow::Owned(rewritten);
            }
        }

        let mut tree = self.parser.parse(&text);
        for transform in &self.tree_transforms {
            transform.transform(&mut tree);
        }
        tree
    }

    /// Run every stage on a document.
    pub fn process(&self, source: &str) -> Result<String, RenderError> {
        let tree = self.parse(source);
        self.compiler.compile(&tree)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages())
            .finish()
    }
}
