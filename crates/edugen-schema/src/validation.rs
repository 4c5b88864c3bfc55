//! Structural validation of parsed JSON against a schema descriptor

use crate::descriptor::{SchemaDescriptor, SchemaKind};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViolationKind {
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: SchemaKind,
        found: &'static str,
    },

    #[error("missing required field '{0}'")]
    MissingField(String),
}

/// A single mismatch between a value and its descriptor.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("at {path}: {kind}")]
pub struct SchemaViolation {
    /// Pointer-style location, `/` for the root (e.g. `/questions/0/marks`)
    pub path: String,
    pub kind: ViolationKind,
}

impl SchemaDescriptor {
    /// Check `value` against this descriptor, collecting every violation.
    ///
    /// Undeclared object fields are allowed; descriptions are ignored.
    pub fn validate(&self, value: &Value) -> Result<(), Vec<SchemaViolation>> {
        let mut violations = Vec::new();
        check(self, value, "/", &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn check(schema: &SchemaDescriptor, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
    match (schema, value) {
        (SchemaDescriptor::String { .. }, Value::String(_)) => {}
        (SchemaDescriptor::Number { .. }, Value::Number(_)) => {}
        (SchemaDescriptor::Array { items, .. }, Value::Array(elements)) => {
            for (i, element) in elements.iter().enumerate() {
                check(items, element, &child_path(path, &i.to_string()), out);
            }
        }
        (
            SchemaDescriptor::Object {
                properties,
                required,
                ..
            },
            Value::Object(fields),
        ) => {
            for name in required {
                if !fields.contains_key(name) {
                    out.push(SchemaViolation {
                        path: path.to_string(),
                        kind: ViolationKind::MissingField(name.clone()),
                    });
                }
            }
            for (name, field_schema) in properties {
                if let Some(field) = fields.get(name) {
                    check(field_schema, field, &child_path(path, name), out);
                }
            }
        }
        (schema, value) => out.push(SchemaViolation {
            path: path.to_string(),
            kind: ViolationKind::TypeMismatch {
                expected: schema.kind(),
                found: json_type_name(value),
            },
        }),
    }
}

fn child_path(parent: &str, segment: &str) -> String {
    if parent == "/" {
        format!("/{}", segment)
    } else {
        format!("{}/{}", parent, segment)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
