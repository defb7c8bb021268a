//! Syntax highlighting for code blocks.
//!
//! Uses syntect's class-based HTML output, so colours come from the site
//! stylesheet rather than inline styles.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::pipeline::TreeTransform;
use crate::tree::{CodeBlock, HighlightedCode, Node, NodeKind};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Tree pass turning code blocks with a known language into highlighted code.
///
/// Code blocks without a language, or with one syntect does not know, are
/// left as plain code blocks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Highlighter;

impl Highlighter {
    /// Create the highlighter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TreeTransform for Highlighter {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn transform(&self, tree: &mut Node) {
        tree.walk_mut(&mut |node| {
            if let NodeKind::Code(code) = &node.kind
                && let Some(highlighted) = highlight(code)
            {
                node.kind = NodeKind::Highlighted(highlighted);
            }
        });
    }
}

/// Highlight a code block, if its language is recognised.
#[must_use]
pub fn highlight(code: &CodeBlock) -> Option<HighlightedCode> {
    let lang = code.lang.as_deref()?;
    let syntax = find_syntax(lang)?;

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
    for line in LinesWithEndings::from(&code.value) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            tracing::warn!(lang, error = %e, "Failed to highlight code block");
            return None;
        }
    }

    Some(HighlightedCode {
        lang: lang.to_owned(),
        html: generator.finalize(),
    })
}

/// Find a syntax by common alias, file extension or name.
fn find_syntax(lang: &str) -> Option<&'static SyntaxReference> {
    let lang_lower = lang.to_lowercase();
    let extension = match lang_lower.as_str() {
        "rust" => "rs",
        "python" => "py",
        "javascript" | "jsx" | "mjs" => "js",
        "typescript" | "tsx" => "ts",
        "shell" | "bash" | "zsh" => "sh",
        "yml" => "yaml",
        "markdown" | "mdx" => "md",
        "golang" => "go",
        "ruby" => "rb",
        "c++" => "cpp",
        "csharp" => "cs",
        other => other,
    };

    let syntaxes: &'static SyntaxSet = &SYNTAX_SET;
    syntaxes
        .find_syntax_by_extension(extension)
        .or_else(|| syntaxes.find_syntax_by_token(&lang_lower))
        .or_else(|| {
            syntaxes
                .syntaxes()
                .iter()
                .find(|syntax| syntax.name.to_lowercase() == lang_lower)
        })
        .filter(|syntax| syntax.name != "Plain Text")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn code(lang: Option<&str>, value: &str) -> CodeBlock {
        CodeBlock {
            lang: lang.map(str::to_owned),
            value: value.to_owned(),
        }
    }

    #[test]
    fn test_highlight_known_language() {
        let highlighted = highlight(&code(Some("rust"), "fn main() {}\n")).unwrap();
        assert_eq!(highlighted.lang, "rust");
        assert!(highlighted.html.contains("<span class=\""));
        assert!(highlighted.html.contains("main"));
    }

    #[test]
    fn test_highlight_escapes_html() {
        let highlighted = highlight(&code(Some("html"), "<b>&</b>\n")).unwrap();
        assert!(highlighted.html.contains("&lt;"));
        assert!(!highlighted.html.contains("<b>"));
    }

    #[test]
    fn test_unknown_language_is_not_highlighted() {
        assert!(highlight(&code(Some("no-such-language"), "x\n")).is_none());
        assert!(highlight(&code(None, "x\n")).is_none());
    }

    #[test]
    fn test_transform_replaces_only_known_code() {
        let mut tree = Node::root(vec![
            Node::new(NodeKind::Code(code(Some("js"), "let a = 1;\n"))),
            Node::new(NodeKind::Code(code(None, "plain\n"))),
        ]);
        Highlighter::new().transform(&mut tree);

        assert!(matches!(tree.children[0].kind, NodeKind::Highlighted(_)));
        assert!(matches!(tree.children[1].kind, NodeKind::Code(_)));
    }
}
