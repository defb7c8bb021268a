//! Directive-to-admonition mapping.
//!
//! Every directive node, whatever its name, is rendered as a themed
//! admonition box:
//!
//! ```text
//! :::info{#warning}            <div class="theme-admonition alert alert-warning">
//! Careful                 →      <p>Careful</p>
//! :::                          </div>
//! ```
//!
//! The `id` attribute selects the styling variant. The directive name and
//! any other attributes do not reach the output.

use std::collections::BTreeMap;

use crate::pipeline::TreeTransform;
use crate::properties::{PropertyValue, element_properties};
use crate::tree::{Directive, Node, RenderHints};

/// Class prefix shared by every admonition box.
pub const ADMONITION_CLASS: &str = "theme-admonition alert alert-";

/// Tree pass attaching admonition render hints to every directive node.
#[derive(Clone, Copy, Debug, Default)]
pub struct AdmonitionMapper;

impl AdmonitionMapper {
    /// Create the mapper.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TreeTransform for AdmonitionMapper {
    fn name(&self) -> &'static str {
        "admonition"
    }

    fn transform(&self, tree: &mut Node) {
        tree.walk_mut(&mut |node| {
            if let Some(directive) = node.directive() {
                node.data = Some(render_hints(directive));
            }
        });
    }
}

/// Compute the render hints for a directive.
///
/// The variant comes from the directive's `id` property. A directive without
/// an identifier falls back to its own name.
#[must_use]
pub fn render_hints(directive: &Directive) -> RenderHints {
    let properties = element_properties(&directive.attributes);
    let identifier = match properties.get("id").and_then(PropertyValue::as_str) {
        Some(id) if !id.is_empty() => id.to_owned(),
        _ => {
            tracing::debug!(
                name = %directive.name,
                "Directive has no identifier, using its name"
            );
            directive.name.clone()
        }
    };

    RenderHints {
        tag_name: "div".to_owned(),
        properties: BTreeMap::from([(
            "class".to_owned(),
            format!("{ADMONITION_CLASS}{identifier}"),
        )]),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use pulldown_cmark::Tag;

    use super::*;
    use crate::tree::NodeKind;

    fn class_of(node: &Node) -> Option<&str> {
        node.data
            .as_ref()
            .and_then(|hints| hints.properties.get("class"))
            .map(String::as_str)
    }

    #[test]
    fn test_identifier_selects_class() {
        let hints = render_hints(&Directive::new("info").with_attribute("id", "danger"));
        assert_eq!(hints.tag_name, "div");
        assert_eq!(
            hints.properties,
            BTreeMap::from([(
                "class".to_owned(),
                "theme-admonition alert alert-danger".to_owned()
            )])
        );
    }

    #[test]
    fn test_name_does_not_affect_output() {
        let a = render_hints(&Directive::new("info").with_attribute("id", "tip"));
        let b = render_hints(&Directive::new("custom").with_attribute("id", "tip"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_other_attributes_are_dropped() {
        let directive = Directive::new("info")
            .with_attribute("id", "note")
            .with_attribute("class", "wide")
            .with_attribute("title", "Hi");
        let hints = render_hints(&directive);
        assert_eq!(hints.properties.len(), 1);
        assert_eq!(
            hints.properties.get("class").map(String::as_str),
            Some("theme-admonition alert alert-note")
        );
    }

    #[test]
    fn test_missing_identifier_falls_back_to_name() {
        let hints = render_hints(&Directive::new("warning"));
        assert_eq!(
            hints.properties.get("class").map(String::as_str),
            Some("theme-admonition alert alert-warning")
        );

        let hints = render_hints(&Directive::new("tip").with_attribute("id", ""));
        assert_eq!(
            hints.properties.get("class").map(String::as_str),
            Some("theme-admonition alert alert-tip")
        );
    }

    fn sample_tree() -> Node {
        Node::root(vec![
            Node::new(NodeKind::ContainerDirective(
                Directive::new("info").with_attribute("id", "tip"),
            ))
            .with_children(vec![
                Node::new(NodeKind::Element(Tag::Paragraph)).with_children(vec![
                    Node::new(NodeKind::TextDirective(
                        Directive::new("kbd").with_attribute("id", "key"),
                    )),
                ]),
            ]),
            Node::new(NodeKind::LeafDirective(Directive::new("video"))),
            Node::new(NodeKind::Element(Tag::Paragraph))
                .with_children(vec![Node::text("plain")]),
        ])
    }

    #[test]
    fn test_transform_annotates_every_directive() {
        let mut tree = sample_tree();
        AdmonitionMapper::new().transform(&mut tree);

        let container = &tree.children[0];
        assert_eq!(class_of(container), Some("theme-admonition alert alert-tip"));
        assert_eq!(
            class_of(&container.children[0].children[0]),
            Some("theme-admonition alert alert-key")
        );
        assert_eq!(class_of(&tree.children[1]), Some("theme-admonition alert alert-video"));

        assert!(tree.data.is_none());
        assert!(tree.children[2].data.is_none());
        assert!(tree.children[2].children[0].data.is_none());
    }

    #[test]
    fn test_transform_is_idempotent() {
        let mapper = AdmonitionMapper::new();
        let mut once = sample_tree();
        mapper.transform(&mut once);

        let mut twice = once.clone();
        mapper.transform(&mut twice);

        assert_eq!(once, twice);
    }
}
