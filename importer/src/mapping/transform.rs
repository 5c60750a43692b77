//! Field transforms.
//!
//! Every transform accepts an absent or empty cell and answers
//! [`FieldValue::NoValue`] for it instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::backend::Resolve;
use crate::error::TransformError;
use crate::models::FieldValue;

/// How a resolved relation is written into the payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationShape {
    /// `{ "connect": [id] }`
    #[default]
    Connect,
    /// The bare identifier.
    Id,
}

/// Computation from a source cell to a destination value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transform {
    /// Exactly `"true"` is `true`; any other non-empty text is `false`.
    Boolean,

    /// Base-10 integer.
    Integer,

    /// Look an existing entry up by natural key.
    Relation {
        content_type: String,
        #[serde(default = "default_natural_key")]
        natural_key: String,
        #[serde(default)]
        shape: RelationShape,
    },
}

fn default_natural_key() -> String {
    "slug".to_string()
}

impl Transform {
    /// Relation to `content_type` by slug, written as a connect reference.
    pub fn relation(content_type: &str) -> Self {
        Transform::Relation {
            content_type: content_type.to_string(),
            natural_key: default_natural_key(),
            shape: RelationShape::Connect,
        }
    }

    /// Apply to a cell. Only relation transforms touch `resolver`.
    pub async fn apply(&self, value: Option<&str>, resolver: &dyn Resolve) -> Result<FieldValue, TransformError> {
        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(FieldValue::NoValue),
        };

        match self {
            Transform::Boolean => Ok(FieldValue::Set(Value::Bool(value == "true"))),
            Transform::Integer => apply_integer(value),
            Transform::Relation {
                content_type,
                natural_key,
                shape,
            } => {
                let resolved = resolver.resolve(value, content_type, natural_key).await;
                Ok(match resolved {
                    Some(id) => FieldValue::Set(match shape {
                        RelationShape::Connect => json!({ "connect": [id.to_value()] }),
                        RelationShape::Id => id.to_value(),
                    }),
                    None => FieldValue::NoValue,
                })
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Transform::Boolean => "boolean",
            Transform::Integer => "integer",
            Transform::Relation { .. } => "relation",
        }
    }
}

fn apply_integer(value: &str) -> Result<FieldValue, TransformError> {
    value
        .trim()
        .parse::<i64>()
        .map(|n| FieldValue::Set(Value::from(n)))
        .map_err(|_| TransformError::NotAnInteger {
            value: value.to_string(),
        })
}
