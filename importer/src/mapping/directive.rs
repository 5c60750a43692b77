//! Mapping specifications and import plans.
//!
//! A [`MappingSpec`] says, for one Strapi content type, what each CSV
//! column becomes. An [`ImportPlan`] is the ordered list of files to
//! import; the order doubles as the dependency order for relation lookups.
//!
//! ## JSON form
//!
//! ```json
//! [
//!   {
//!     "file": "Blog.csv",
//!     "content_type": "blogs",
//!     "fields": {
//!       "Slug": "slug",
//!       "Thumbnail": null,
//!       "Featured": { "type": "transform", "field": "featured", "transform": { "type": "boolean" } },
//!       "Author": {
//!         "type": "transform",
//!         "field": "author",
//!         "transform": { "type": "relation", "content_type": "authors" }
//!       }
//!     }
//!   }
//! ]
//! ```
//!
//! A string directive is a rename and `null` is a skip. Column order in the
//! `fields` object is the order the mapper walks them in.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::transform::Transform;
use crate::error::{PlanError, PlanResult};

/// What one source column turns into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldDirective {
    /// Copy the cell verbatim into `field`.
    Rename { field: String },

    /// Never write this column (media uploads, manual fields).
    Skip,

    /// Compute `field` from the cell.
    Transform { field: String, transform: Transform },
}

impl FieldDirective {
    /// Destination field, `None` for skips.
    pub fn destination(&self) -> Option<&str> {
        match self {
            FieldDirective::Rename { field } | FieldDirective::Transform { field, .. } => Some(field),
            FieldDirective::Skip => None,
        }
    }
}

/// One `column -> directive` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub column: String,
    pub directive: FieldDirective,
}

/// Column mappings for one content type, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSpec {
    /// Strapi API path segment, e.g. `blogs`.
    pub content_type: String,

    #[serde(
        serialize_with = "serialize_fields",
        deserialize_with = "deserialize_fields"
    )]
    pub fields: Vec<FieldMapping>,
}

impl MappingSpec {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            fields: Vec::new(),
        }
    }

    /// Map `column` to `field` unchanged.
    pub fn rename(self, column: &str, field: &str) -> Self {
        self.with(
            column,
            FieldDirective::Rename {
                field: field.to_string(),
            },
        )
    }

    /// Ignore `column`.
    pub fn skip(self, column: &str) -> Self {
        self.with(column, FieldDirective::Skip)
    }

    /// Compute `field` from `column`.
    pub fn transform(self, column: &str, field: &str, transform: Transform) -> Self {
        self.with(
            column,
            FieldDirective::Transform {
                field: field.to_string(),
                transform,
            },
        )
    }

    fn with(mut self, column: &str, directive: FieldDirective) -> Self {
        self.fields.push(FieldMapping {
            column: column.to_string(),
            directive,
        });
        self
    }

    pub fn directive(&self, column: &str) -> Option<&FieldDirective> {
        self.fields
            .iter()
            .find(|m| m.column == column)
            .map(|m| &m.directive)
    }

    /// Source columns the spec reads (skipped ones included).
    pub fn source_columns(&self) -> Vec<&str> {
        self.fields.iter().map(|m| m.column.as_str()).collect()
    }

    /// Check that every destination field has exactly one source column.
    pub fn validate(&self, file: &str) -> PlanResult<()> {
        let mut seen = HashSet::new();
        for field in self.fields.iter().filter_map(|m| m.directive.destination()) {
            if !seen.insert(field) {
                return Err(PlanError::DuplicateField {
                    file: file.to_string(),
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Configured columns that `headers` does not have.
    pub fn missing_columns<'a>(&'a self, headers: &[String]) -> Vec<&'a str> {
        self.fields
            .iter()
            .filter(|m| m.directive != FieldDirective::Skip)
            .map(|m| m.column.as_str())
            .filter(|col| !headers.iter().any(|h| h == col))
            .collect()
    }
}

/// A source file and the spec its rows are mapped with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileImport {
    /// File name inside the CSV directory.
    pub file: String,

    #[serde(flatten)]
    pub spec: MappingSpec,
}

impl FileImport {
    pub fn new(file: impl Into<String>, spec: MappingSpec) -> Self {
        Self {
            file: file.into(),
            spec,
        }
    }

    pub fn content_type(&self) -> &str {
        &self.spec.content_type
    }
}

/// Files to import, in import order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImportPlan {
    pub files: Vec<FileImport>,
}

impl ImportPlan {
    pub fn new(files: Vec<FileImport>) -> Self {
        Self { files }
    }

    /// Parse and validate a plan from JSON.
    pub fn from_json(json: &str) -> PlanResult<Self> {
        let plan: ImportPlan = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Read, parse and validate a plan file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PlanResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> PlanResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> PlanResult<()> {
        let mut seen = HashSet::new();
        for entry in &self.files {
            if !seen.insert(entry.file.as_str()) {
                return Err(PlanError::DuplicateFile(entry.file.clone()));
            }
            entry.spec.validate(&entry.file)?;
        }
        Ok(())
    }

    pub fn get(&self, file: &str) -> Option<&FileImport> {
        self.files.iter().find(|f| f.file == file)
    }

    /// Plan restricted to `file`, or `None` if it is not configured.
    pub fn only(&self, file: &str) -> Option<ImportPlan> {
        self.get(file).map(|entry| ImportPlan::new(vec![entry.clone()]))
    }
}

// =============================================================================
// Ordered field map (de)serialization
// =============================================================================

/// Accepted directive spellings in plan files.
#[derive(Deserialize)]
#[serde(untagged)]
enum DirectiveRepr {
    Rename(String),
    Tagged(FieldDirective),
}

fn serialize_fields<S: Serializer>(fields: &[FieldMapping], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for mapping in fields {
        match &mapping.directive {
            FieldDirective::Rename { field } => map.serialize_entry(&mapping.column, field)?,
            FieldDirective::Skip => map.serialize_entry(&mapping.column, &None::<String>)?,
            directive => map.serialize_entry(&mapping.column, directive)?,
        }
    }
    map.end()
}

fn deserialize_fields<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<FieldMapping>, D::Error> {
    struct FieldsVisitor;

    impl<'de> Visitor<'de> for FieldsVisitor {
        type Value = Vec<FieldMapping>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object mapping CSV columns to field directives")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut fields: Vec<FieldMapping> = Vec::new();
            while let Some(column) = access.next_key::<String>()? {
                let repr: Option<DirectiveRepr> = access.next_value()?;
                if fields.iter().any(|m| m.column == column) {
                    return Err(serde::de::Error::custom(format!("duplicate column '{}'", column)));
                }
                let directive = match repr {
                    None => FieldDirective::Skip,
                    Some(DirectiveRepr::Rename(field)) => FieldDirective::Rename { field },
                    Some(DirectiveRepr::Tagged(directive)) => directive,
                };
                fields.push(FieldMapping { column, directive });
            }
            Ok(fields)
        }
    }

    deserializer.deserialize_map(FieldsVisitor)
}
