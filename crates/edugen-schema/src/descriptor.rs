//! Schema descriptor - the JSON shape handed to the model and to callers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Primitive kind of a descriptor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    String,
    Number,
    Array,
    Object,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaKind::String => write!(f, "string"),
            SchemaKind::Number => write!(f, "number"),
            SchemaKind::Array => write!(f, "array"),
            SchemaKind::Object => write!(f, "object"),
        }
    }
}

/// Structural description of an expected JSON value.
///
/// Serializes to the model service's wire form, e.g.
/// `{"type":"OBJECT","properties":{...},"required":[...]}`. Lower-case
/// type tags are accepted when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SchemaDescriptor {
    #[serde(rename = "STRING", alias = "string")]
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    #[serde(rename = "NUMBER", alias = "number")]
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    #[serde(rename = "ARRAY", alias = "array")]
    Array {
        items: Box<SchemaDescriptor>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },

    #[serde(rename = "OBJECT", alias = "object")]
    Object {
        properties: BTreeMap<String, SchemaDescriptor>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        required: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl SchemaDescriptor {
    pub fn string() -> Self {
        SchemaDescriptor::String { description: None }
    }

    pub fn number() -> Self {
        SchemaDescriptor::Number { description: None }
    }

    pub fn array(items: SchemaDescriptor) -> Self {
        SchemaDescriptor::Array {
            items: Box::new(items),
            description: None,
        }
    }

    /// Build an object node. Every name in `required` should also be a key
    /// in `properties`.
    pub fn object<'a>(
        properties: impl IntoIterator<Item = (&'a str, SchemaDescriptor)>,
        required: &[&str],
    ) -> Self {
        SchemaDescriptor::Object {
            properties: properties
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
            required: required.iter().map(|r| r.to_string()).collect(),
            description: None,
        }
    }

    /// Attach a human-readable description. Forwarded to the model only.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            SchemaDescriptor::String { description }
            | SchemaDescriptor::Number { description }
            | SchemaDescriptor::Array { description, .. }
            | SchemaDescriptor::Object { description, .. } => *description = Some(text.into()),
        }
        self
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            SchemaDescriptor::String { .. } => SchemaKind::String,
            SchemaDescriptor::Number { .. } => SchemaKind::Number,
            SchemaDescriptor::Array { .. } => SchemaKind::Array,
            SchemaDescriptor::Object { .. } => SchemaKind::Object,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SchemaDescriptor::String { description }
            | SchemaDescriptor::Number { description }
            | SchemaDescriptor::Array { description, .. }
            | SchemaDescriptor::Object { description, .. } => description.as_deref(),
        }
    }

    /// Required field names; empty for non-object nodes.
    pub fn required_fields(&self) -> &[String] {
        match self {
            SchemaDescriptor::Object { required, .. } => required,
            _ => &[],
        }
    }

    /// Look up a declared property of an object node.
    pub fn property(&self, name: &str) -> Option<&SchemaDescriptor> {
        match self {
            SchemaDescriptor::Object { properties, .. } => properties.get(name),
            _ => None,
        }
    }
}
