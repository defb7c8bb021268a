//! Directive attribute parsing.
//!
//! Parses the `{#id .class key="value" flag}` block of a directive into
//! [`Attributes`].

use crate::tree::Attributes;

/// Parse an attribute block (without braces) into attributes.
///
/// - `#id` sets `id` (last one wins)
/// - `.class` entries are collected into a space-separated `class`
/// - `key="value"`, `key='value'` and `key=value` set `key`
/// - a bare `key` is stored with an empty value
#[must_use]
pub fn parse_attributes(attrs_str: &str) -> Attributes {
    let mut attributes = Attributes::new();
    let mut classes: Vec<&str> = Vec::new();

    let mut remaining = attrs_str.trim();

    while !remaining.is_empty() {
        remaining = remaining.trim_start();
        if remaining.is_empty() {
            break;
        }

        if let Some(rest) = remaining.strip_prefix('#') {
            let end = shorthand_end(rest);
            if end > 0 {
                attributes.insert("id".to_owned(), rest[..end].to_owned());
            }
            remaining = &rest[end..];
        } else if let Some(rest) = remaining.strip_prefix('.') {
            let end = shorthand_end(rest);
            if end > 0 {
                classes.push(&rest[..end]);
            }
            remaining = &rest[end..];
        } else if let Some((key, value, rest)) = parse_key_value(remaining) {
            attributes.insert(key.to_owned(), value.to_owned());
            remaining = rest;
        } else if let Some((key, rest)) = parse_bare_key(remaining) {
            attributes.insert(key.to_owned(), String::new());
            remaining = rest;
        } else {
            // Skip unrecognized character
            let skip = remaining.chars().next().map_or(1, char::len_utf8);
            remaining = &remaining[skip..];
        }
    }

    if !classes.is_empty() {
        attributes.insert("class".to_owned(), classes.join(" "));
    }

    attributes
}

/// End of an `#id` / `.class` shorthand value.
fn shorthand_end(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == '.' || c == '#')
        .unwrap_or(s.len())
}

/// Parse a key-value pair from the attributes string.
///
/// Supports: `key="value"`, `key='value'`, `key=value`
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let key_end = s.find(|c: char| c == '=' || c.is_whitespace())?;
    if !s[key_end..].starts_with('=') {
        return None;
    }
    let key = &s[..key_end];

    if key.is_empty() || key.starts_with('#') || key.starts_with('.') {
        return None;
    }

    let after_eq = &s[key_end + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}

/// Parse a bare attribute name (`hidden`).
fn parse_bare_key(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == ':'))
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((&s[..end], &s[end..]))
}
