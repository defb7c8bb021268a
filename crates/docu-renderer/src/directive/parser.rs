//! Directive syntax parsing.
//!
//! Parses `CommonMark` directive syntax: `:name`, `::name`, `:::name`

use super::args::parse_attributes;
use crate::tree::{Attributes, Directive};

/// Parsed directive line or inline occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParsedDirective {
    /// Inline directive: `:name[label]{attrs}`
    Text { directive: Directive, label: String },
    /// Leaf directive: `::name[label]{attrs}`
    Leaf { directive: Directive, label: String },
    /// Container opening: `:::name[label]{attrs}`
    ContainerStart {
        directive: Directive,
        label: String,
        colon_count: usize,
    },
    /// Container closing: `:::`
    ContainerEnd { colon_count: usize },
}

/// Parse a whole line as a block directive (container start/end or leaf).
///
/// Up to three spaces of indentation are allowed. Anything after the
/// attribute block other than whitespace makes the line ordinary text.
pub(crate) fn parse_block_line(line: &str) -> Option<ParsedDirective> {
    let line = line.trim_end_matches(['\n', '\r']);
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }
    let trimmed = &line[indent..];

    let colon_count = trimmed.chars().take_while(|&c| c == ':').count();
    if colon_count < 2 {
        return None;
    }
    let after_colons = &trimmed[colon_count..];

    if after_colons.trim().is_empty() {
        return (colon_count >= 3).then_some(ParsedDirective::ContainerEnd { colon_count });
    }

    let (directive, label, consumed) = parse_directive_body(after_colons)?;
    if !after_colons[consumed..].trim().is_empty() {
        return None;
    }

    if colon_count == 2 {
        Some(ParsedDirective::Leaf { directive, label })
    } else {
        Some(ParsedDirective::ContainerStart {
            directive,
            label,
            colon_count,
        })
    }
}

/// Find the first inline directive in a piece of text.
///
/// Returns the directive and its byte range. A colon preceded by an
/// alphanumeric character or another colon does not start a directive, so
/// URLs, times and `::` runs stay text.
pub(crate) fn find_text_directive(text: &str) -> Option<(ParsedDirective, usize, usize)> {
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find(':') {
        let start = search_from + offset;
        search_from = start + 1;

        if let Some((parsed, end)) = text_directive_at(text, start) {
            return Some((parsed, start, end));
        }
    }

    None
}

/// Parse an inline directive starting at the colon at byte `start`.
///
/// Returns the directive and the byte offset just past it.
pub(crate) fn text_directive_at(text: &str, start: usize) -> Option<(ParsedDirective, usize)> {
    if !text[start..].starts_with(':') {
        return None;
    }

    let prev = text[..start].chars().next_back();
    if prev.is_some_and(|c| c.is_alphanumeric() || c == ':') {
        return None;
    }

    let after = &text[start + 1..];
    if after.starts_with(':') {
        return None;
    }

    let (directive, label, consumed) = parse_directive_body(after)?;
    Some((
        ParsedDirective::Text { directive, label },
        start + 1 + consumed,
    ))
}

/// Check for an inline directive at byte `start` whose `[` label is not
/// closed within `text`.
///
/// Returns the directive name and the byte offset just past the `[`.
pub(crate) fn unclosed_label_at(text: &str, start: usize) -> Option<(String, usize)> {
    let (parsed, end) = text_directive_at(text, start)?;
    let ParsedDirective::Text { directive, label } = parsed else {
        return None;
    };
    let name_end = start + 1 + directive.name.len();
    (end == name_end && label.is_empty() && text[name_end..].starts_with('['))
        .then(|| (directive.name, name_end + 1))
}

/// Parse an optional `{attrs}` block at the start of `s`.
///
/// Returns the attributes and the number of bytes consumed.
pub(crate) fn parse_attribute_block(s: &str) -> (Attributes, usize) {
    let (attrs_str, consumed) = parse_braces(s);
    (parse_attributes(&attrs_str), consumed)
}

/// Parse `name[label]{attrs}` following the colons.
///
/// Returns the directive, its label and the number of bytes consumed.
fn parse_directive_body(s: &str) -> Option<(Directive, String, usize)> {
    let name_end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len());

    let name = &s[..name_end];
    if !is_valid_directive_name(name) {
        return None;
    }
    let mut pos = name_end;

    let (label, label_consumed) = parse_brackets(&s[pos..]);
    pos += label_consumed;

    let (attrs_str, attrs_consumed) = parse_braces(&s[pos..]);
    pos += attrs_consumed;

    let directive = Directive {
        name: name.to_owned(),
        attributes: parse_attributes(&attrs_str),
    };

    Some((directive, label, pos))
}

/// Check if a name is a valid directive name.
///
/// Names start with an ASCII letter followed by letters, digits, hyphens
/// and underscores.
fn is_valid_directive_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Parse content from brackets: `[content]`
///
/// Returns (content, `bytes_consumed`).
fn parse_brackets(s: &str) -> (String, usize) {
    parse_delimited(s, '[', ']')
}

/// Parse attributes from braces: `{#id .class key="value"}`
///
/// Returns (`attrs_str` without braces, `bytes_consumed`).
fn parse_braces(s: &str) -> (String, usize) {
    parse_delimited(s, '{', '}')
}

/// Find the matching closing delimiter, handling nesting.
fn parse_delimited(s: &str, open: char, close: char) -> (String, usize) {
    if !s.starts_with(open) {
        return (String::new(), 0);
    }

    let mut depth = 0;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return (s[1..i].to_owned(), i + 1);
            }
        }
    }

    (String::new(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(directive: &Directive) -> Option<&str> {
        directive.attributes.get("id").map(String::as_str)
    }

    #[test]
    fn test_container_start_from_rewritten_shorthand() {
        let parsed = parse_block_line(":::info{#note}\n").unwrap();
        match parsed {
            ParsedDirective::ContainerStart {
                directive,
                label,
                colon_count,
            } => {
                assert_eq!(directive.name, "info");
                assert_eq!(id(&directive), Some("note"));
                assert_eq!(label, "");
                assert_eq!(colon_count, 3);
            }
            other => panic!("expected container start, got {other:?}"),
        }
    }

    #[test]
    fn test_container_with_label() {
        let parsed = parse_block_line(":::details[Click to expand]{.wide}").unwrap();
        match parsed {
            ParsedDirective::ContainerStart {
                directive, label, ..
            } => {
                assert_eq!(directive.name, "details");
                assert_eq!(label, "Click to expand");
                assert_eq!(
                    directive.attributes.get("class").map(String::as_str),
                    Some("wide")
                );
            }
            other => panic!("expected container start, got {other:?}"),
        }
    }

    #[test]
    fn test_container_end() {
        assert_eq!(
            parse_block_line(":::"),
            Some(ParsedDirective::ContainerEnd { colon_count: 3 })
        );
        assert_eq!(
            parse_block_line("::::  \n"),
            Some(ParsedDirective::ContainerEnd { colon_count: 4 })
        );
    }

    #[test]
    fn test_two_colons_alone_is_not_a_directive() {
        assert_eq!(parse_block_line("::"), None);
    }

    #[test]
    fn test_leaf_directive() {
        let parsed = parse_block_line("::youtube[Intro]{#dQw4w9WgXcQ}").unwrap();
        match parsed {
            ParsedDirective::Leaf { directive, label } => {
                assert_eq!(directive.name, "youtube");
                assert_eq!(label, "Intro");
                assert_eq!(id(&directive), Some("dQw4w9WgXcQ"));
            }
            other => panic!("expected leaf, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_text_makes_line_plain() {
        assert_eq!(parse_block_line(":::note some title"), None);
        assert_eq!(parse_block_line("::leaf{#a} trailing"), None);
    }

    #[test]
    fn test_space_after_colons_is_not_a_directive() {
        assert_eq!(parse_block_line("::: note"), None);
    }

    #[test]
    fn test_indentation_limit() {
        assert!(parse_block_line("   :::note").is_some());
        assert_eq!(parse_block_line("    :::note"), None);
    }

    #[test]
    fn test_find_text_directive() {
        let (parsed, start, end) =
            find_text_directive(r#"Press :kbd[Ctrl+C]{title="copy"} now"#).unwrap();
        assert_eq!(start, 6);
        assert_eq!(end, 32);
        match parsed {
            ParsedDirective::Text { directive, label } => {
                assert_eq!(directive.name, "kbd");
                assert_eq!(label, "Ctrl+C");
                assert_eq!(
                    directive.attributes.get("title").map(String::as_str),
                    Some("copy")
                );
            }
            other => panic!("expected text directive, got {other:?}"),
        }
    }

    #[test]
    fn test_text_directive_skips_urls_and_times() {
        assert!(find_text_directive("see https://example.com").is_none());
        assert!(find_text_directive("at 10:30 today").is_none());
        assert!(find_text_directive("note:thing").is_none());
    }

    #[test]
    fn test_text_directive_after_rejected_colon() {
        let (_, start, _) = find_text_directive("a:b then :x[y]").unwrap();
        assert_eq!(start, 9);
    }

    #[test]
    fn test_text_directive_at() {
        let text = "x :abbr[HTML] y";
        let (parsed, end) = text_directive_at(text, 2).unwrap();
        assert_eq!(end, 13);
        assert!(matches!(parsed, ParsedDirective::Text { .. }));
        assert!(text_directive_at(text, 0).is_none());
    }

    #[test]
    fn test_unclosed_label_at() {
        let text = "See :abbr[";
        assert_eq!(unclosed_label_at(text, 4), Some(("abbr".to_owned(), 10)));
        assert_eq!(unclosed_label_at("See :abbr[HTML]", 4), None);
        assert_eq!(unclosed_label_at("See :abbr now", 4), None);
    }

    #[test]
    fn test_parse_attribute_block() {
        let (attributes, consumed) = parse_attribute_block("{#term .wide} rest");
        assert_eq!(consumed, 13);
        assert_eq!(attributes.get("id").map(String::as_str), Some("term"));
        assert_eq!(attributes.get("class").map(String::as_str), Some("wide"));

        assert_eq!(parse_attribute_block(" {#x}"), (Attributes::new(), 0));
    }

    #[test]
    fn test_is_valid_directive_name() {
        assert!(is_valid_directive_name("kbd"));
        assert!(is_valid_directive_name("my-directive"));
        assert!(is_valid_directive_name("directive_name2"));
        assert!(!is_valid_directive_name(""));
        assert!(!is_valid_directive_name("123"));
        assert!(!is_valid_directive_name("_x"));
    }

    #[test]
    fn test_parse_brackets() {
        assert_eq!(parse_brackets("[hello]"), ("hello".to_owned(), 7));
        assert_eq!(
            parse_brackets("[nested [brackets]]"),
            ("nested [brackets]".to_owned(), 19)
        );
        assert_eq!(parse_brackets("no brackets"), (String::new(), 0));
        assert_eq!(parse_brackets("[unclosed"), (String::new(), 0));
    }

    #[test]
    fn test_parse_braces() {
        assert_eq!(parse_braces("{#id}"), ("#id".to_owned(), 5));
        assert_eq!(parse_braces("{.class} rest"), (".class".to_owned(), 8));
        assert_eq!(parse_braces("{unclosed"), (String::new(), 0));
    }
}
