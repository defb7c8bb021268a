//! YAML front matter.
//!
//! A document may start with a metadata block:
//!
//! ```text
//! ---
//! title: Getting started
//! tags: [intro]
//! ---
//! # Body starts here
//! ```
//!
//! The block runs from an opening `---` line to the next `---` line. A block
//! that is never closed swallows the rest of the document.

use serde_json::{Map, Value};

use crate::SiteError;

const DELIMITER: &str = "---";

/// A document split into metadata and body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrontMatter {
    /// Metadata from the front matter block, empty when there is none.
    pub metadata: Map<String, Value>,
    /// Everything after the front matter block.
    pub body: String,
}

impl FrontMatter {
    /// Split a document into front matter and body.
    pub fn parse(content: &str) -> Result<Self, SiteError> {
        let Some((yaml, body)) = split(content) else {
            return Ok(Self {
                metadata: Map::new(),
                body: content.to_owned(),
            });
        };

        Ok(Self {
            metadata: parse_metadata(yaml)?,
            body: body.to_owned(),
        })
    }
}

/// Split off the front matter block, returning `(yaml, body)`.
fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end() == DELIMITER {
            return Some((&content[yaml_start..offset], &content[offset + line.len()..]));
        }
        offset += line.len();
    }

    Some((&content[yaml_start..], ""))
}

fn parse_metadata(yaml: &str) -> Result<Map<String, Value>, SiteError> {
    if yaml.trim().is_empty() {
        return Ok(Map::new());
    }

    serde_yaml::from_str::<Option<Map<String, Value>>>(yaml)
        .map(Option::unwrap_or_default)
        .map_err(|e| SiteError::FrontMatter(e.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_no_front_matter() {
        let doc = FrontMatter::parse("# Title\n\nBody\n").unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "# Title\n\nBody\n");
    }

    #[test]
    fn test_front_matter_is_split() {
        let doc = FrontMatter::parse("---\ntitle: Hello\ntags: [a, b]\n---\n# Body\n").unwrap();
        assert_eq!(doc.metadata.get("title"), Some(&json!("Hello")));
        assert_eq!(doc.metadata.get("tags"), Some(&json!(["a", "b"])));
        assert_eq!(doc.body, "# Body\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let doc = FrontMatter::parse("---\r\nn: 1\r\n---\r\nBody").unwrap();
        assert_eq!(doc.metadata.get("n"), Some(&json!(1)));
        assert_eq!(doc.body, "Body");
    }

    #[test]
    fn test_empty_front_matter() {
        let doc = FrontMatter::parse("---\n---\nBody\n").unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "Body\n");
    }

    #[test]
    fn test_unclosed_front_matter_takes_everything() {
        let doc = FrontMatter::parse("---\ntitle: x\n").unwrap();
        assert_eq!(doc.metadata.get("title"), Some(&json!("x")));
        assert_eq!(doc.body, "");
    }

    #[test]
    fn test_thematic_break_later_is_body() {
        let doc = FrontMatter::parse("Intro\n---\nMore\n").unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.body, "Intro\n---\nMore\n");
    }

    #[test]
    fn test_non_mapping_is_an_error() {
        let err = FrontMatter::parse("---\n- a\n- b\n---\nBody").unwrap_err();
        assert!(matches!(err, SiteError::FrontMatter(_)));
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nBody").unwrap_err();
        assert!(matches!(err, SiteError::FrontMatter(_)));
    }
}
