//! Field mapper: one CSV row to one Strapi payload.

use serde_json::Value;
use tracing::warn;

use super::directive::{FieldDirective, MappingSpec};
use crate::backend::Resolve;
use crate::models::{FieldValue, Payload, Row};

/// A field whose transform failed. The field is left out of the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWarning {
    pub column: String,
    pub field: String,
    pub message: String,
}

/// Mapper output for one row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedRow {
    pub payload: Payload,
    pub warnings: Vec<FieldWarning>,
}

/// Build the payload for `row`.
///
/// Columns are visited in declaration order:
///
/// - skip directives never produce a key
/// - renames copy non-empty cells verbatim; empty or absent cells are left out
/// - transforms see the raw cell (absent, empty or not) and decide; a
///   [`FieldValue::NoValue`] result or a transform error leaves the field out
///
/// The mapper itself performs no I/O; relation transforms go through
/// `resolver`.
pub async fn map_row(row: &Row, spec: &MappingSpec, resolver: &dyn Resolve) -> MappedRow {
    let mut mapped = MappedRow::default();

    for mapping in &spec.fields {
        let value = row.get(&mapping.column);

        match &mapping.directive {
            FieldDirective::Skip => {}

            FieldDirective::Rename { field } => {
                if let Some(v) = value.filter(|v| !v.is_empty()) {
                    mapped.payload.insert(field.as_str(), Value::String(v.to_string()));
                }
            }

            FieldDirective::Transform { field, transform } => match transform.apply(value, resolver).await {
                Ok(FieldValue::Set(v)) => mapped.payload.insert(field.as_str(), v),
                Ok(FieldValue::NoValue) => {}
                Err(e) => {
                    warn!(
                        content_type = %spec.content_type,
                        column = %mapping.column,
                        transform = transform.name(),
                        "Dropping field '{}': {}", field, e
                    );
                    mapped.warnings.push(FieldWarning {
                        column: mapping.column.clone(),
                        field: field.clone(),
                        message: e.to_string(),
                    });
                }
            },
        }
    }

    mapped
}
