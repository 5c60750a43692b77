//! Domain models shared by the parser, mapper and importer.
//!
//! - [`Row`] - one parsed CSV line, columns in header order
//! - [`Payload`] - the `data` object sent to Strapi for one row
//! - [`FieldValue`] - a transform result, or the no-value sentinel
//! - [`EntryId`] - identifier of an existing Strapi entry
//! - [`ImportSummary`] / [`RunSummary`] - per-file and per-run tallies

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// =============================================================================
// Row
// =============================================================================

/// One data line of a source file.
///
/// Columns keep header order. An empty string is a present-but-empty cell,
/// which is not the same as a column the file does not have.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell. A repeated column name keeps its first value.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        if self.get(&column).is_none() {
            self.cells.push((column, value.into()));
        }
    }

    /// Value of `column`, matched exactly and case-sensitively.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.push(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

// =============================================================================
// Payload
// =============================================================================

/// Destination fields for one entry, in mapping-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Request body for `POST /api/{contentType}`.
    pub fn to_request_body(&self) -> Value {
        serde_json::json!({ "data": self.0 })
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

// =============================================================================
// Field values
// =============================================================================

/// Result of a field transform.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Write this value to the destination field.
    Set(Value),
    /// The field contributes nothing to the payload.
    NoValue,
}

impl FieldValue {
    pub fn is_no_value(&self) -> bool {
        matches!(self, FieldValue::NoValue)
    }
}

/// Identifier of an existing backend entry.
///
/// Strapi returns numeric ids; string ids are accepted so document ids
/// round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryId {
    Number(u64),
    Text(String),
}

impl EntryId {
    pub fn to_value(&self) -> Value {
        match self {
            EntryId::Number(n) => Value::from(*n),
            EntryId::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryId::Number(n) => write!(f, "{}", n),
            EntryId::Text(s) => write!(f, "{}", s),
        }
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Submission tally for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub file: String,
    pub content_type: String,
    pub attempted: usize,
    pub succeeded: usize,
}

impl ImportSummary {
    pub fn new(file: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            content_type: content_type.into(),
            attempted: 0,
            succeeded: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.succeeded += 1;
    }

    /// Count an attempt that created nothing.
    pub fn record_failure(&mut self) {
        self.attempted += 1;
    }

    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded
    }
}

/// What happened to one configured file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Rows were submitted (possibly with failures).
    Imported(ImportSummary),
    /// File not present in the source directory.
    Missing,
    /// File parsed to zero rows.
    Empty,
    /// File exists but could not be read or parsed.
    Unreadable { reason: String },
    /// File requested but has no mapping spec.
    Unconfigured,
}

/// Per-file report, in run order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub file: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Accumulated result of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
}

impl RunSummary {
    pub fn push(&mut self, file: impl Into<String>, outcome: FileOutcome) {
        self.files.push(FileReport {
            file: file.into(),
            outcome,
        });
    }

    /// Summary for `file`, if it was imported.
    pub fn imported(&self, file: &str) -> Option<&ImportSummary> {
        self.files.iter().find_map(|r| match &r.outcome {
            FileOutcome::Imported(s) if r.file == file => Some(s),
            _ => None,
        })
    }

    pub fn total_attempted(&self) -> usize {
        self.summaries().map(|s| s.attempted).sum()
    }

    pub fn total_succeeded(&self) -> usize {
        self.summaries().map(|s| s.succeeded).sum()
    }

    fn summaries(&self) -> impl Iterator<Item = &ImportSummary> {
        self.files.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Imported(s) => Some(s),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_distinguishes_empty_and_absent() {
        let row: Row = [("Slug", "jane-doe"), ("Image", "")].into_iter().collect();
        assert_eq!(row.get("Slug"), Some("jane-doe"));
        assert_eq!(row.get("Image"), Some(""));
        assert_eq!(row.get("Bio"), None);
        assert_eq!(row.get("slug"), None);
    }

    #[test]
    fn test_row_serializes_in_header_order() {
        let row: Row = [("Title", "Hello"), ("Slug", "hello")].into_iter().collect();
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"Title":"Hello","Slug":"hello"}"#);
    }

    #[test]
    fn test_payload_request_body() {
        let mut payload = Payload::new();
        payload.insert("title", json!("Hello"));
        payload.insert("featured", json!(true));
        assert_eq!(
            payload.to_request_body(),
            json!({ "data": { "title": "Hello", "featured": true } })
        );
    }

    #[test]
    fn test_entry_id_parses_number_or_text() {
        let n: EntryId = serde_json::from_value(json!(42)).unwrap();
        let s: EntryId = serde_json::from_value(json!("abc123")).unwrap();
        assert_eq!(n, EntryId::Number(42));
        assert_eq!(s, EntryId::Text("abc123".into()));
        assert_eq!(n.to_value(), json!(42));
    }

    #[test]
    fn test_run_summary_totals() {
        let mut authors = ImportSummary::new("Authors.csv", "authors");
        authors.record_success();
        authors.record_failure();

        let mut run = RunSummary::default();
        run.push("Authors.csv", FileOutcome::Imported(authors));
        run.push("Blog.csv", FileOutcome::Missing);

        assert_eq!(run.total_attempted(), 2);
        assert_eq!(run.total_succeeded(), 1);
        assert_eq!(run.imported("Authors.csv").unwrap().failed(), 1);
        assert!(run.imported("Blog.csv").is_none());
    }
}
