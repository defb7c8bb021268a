//! Generic directive-to-element property mapping.
//!
//! Converts directive attributes into element properties the way an element
//! factory would: `id` stays a string, `class` becomes a list of class
//! names, an attribute without a value becomes a boolean flag and everything
//! else is kept as a string.

use std::collections::BTreeMap;

use crate::tree::Attributes;

/// Element property value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyValue {
    /// Plain string value.
    String(String),
    /// Space-separated list (class names).
    List(Vec<String>),
    /// Boolean flag.
    Bool(bool),
}

impl PropertyValue {
    /// The value as a string, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::List(_) | Self::Bool(_) => None,
        }
    }
}

/// Element properties keyed by name.
pub type Properties = BTreeMap<String, PropertyValue>;

/// Map directive attributes to element properties.
#[must_use]
pub fn element_properties(attributes: &Attributes) -> Properties {
    attributes
        .iter()
        .map(|(key, value)| {
            let property = match key.as_str() {
                "id" => PropertyValue::String(value.clone()),
                "class" => {
                    PropertyValue::List(value.split_whitespace().map(str::to_owned).collect())
                }
                _ if value.is_empty() => PropertyValue::Bool(true),
                _ => PropertyValue::String(value.clone()),
            };
            (key.clone(), property)
        })
        .collect()
}
