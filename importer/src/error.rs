//! Error types for the import run.
//!
//! Errors are layered the same way the run is:
//!
//! - [`CsvError`] - reading or decoding a source file
//! - [`PlanError`] - loading or checking an import plan
//! - [`TransformError`] - a single field transform failed
//! - [`BackendError`] - talking to the Strapi REST API
//! - [`ImportError`] - run-level failures (the only ones that abort a run)
//!
//! `From` conversions let `?` cross layers where a failure is allowed to
//! propagate. Row and field errors are logged and counted by the importer
//! instead of being returned.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors while reading a source file into rows.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Malformed delimited text.
    #[error("Invalid CSV at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// No header row.
    #[error("No headers found in CSV")]
    NoHeaders,
}

impl From<csv::Error> for CsvError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CsvError::ParseError {
            line,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Plan Errors
// =============================================================================

/// Errors while loading or checking an import plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// Plan file could not be read.
    #[error("Failed to read plan: {0}")]
    IoError(#[from] std::io::Error),

    /// Plan file is not valid JSON or has the wrong shape.
    #[error("Invalid plan: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Two directives write the same destination field.
    #[error("Field '{field}' is written by more than one column in {file}")]
    DuplicateField { file: String, field: String },

    /// The same source file is configured twice.
    #[error("File '{0}' is configured more than once")]
    DuplicateFile(String),
}

// =============================================================================
// Transform Errors
// =============================================================================

/// A field transform could not produce a value.
///
/// Never aborts a row: the mapper drops the field and reports a warning.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Source value is not an integer.
    #[error("'{value}' is not an integer")]
    NotAnInteger { value: String },
}

// =============================================================================
// Backend Errors
// =============================================================================

/// Errors from the Strapi REST API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Connection, TLS or timeout failure.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("Request rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// 2xx response that does not decode into the expected envelope.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// Response body of a rejected request, if the backend sent one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            BackendError::Rejected { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

// =============================================================================
// Import Errors (top-level)
// =============================================================================

/// Run-level errors.
///
/// `SourceDirMissing` is the only one [`crate::Importer::run_all`] returns;
/// the others come from setting the run up (loading the plan, building the
/// HTTP client).
#[derive(Debug, Error)]
pub enum ImportError {
    /// The configured CSV directory does not exist.
    #[error("CSV directory not found: {}", .0.display())]
    SourceDirMissing(PathBuf),

    /// Plan could not be loaded.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// HTTP client could not be built.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Result type for run-level operations.
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let plan_err = PlanError::DuplicateFile("Blog.csv".into());
        let import_err: ImportError = plan_err.into();
        assert!(import_err.to_string().contains("Blog.csv"));

        let backend_err = BackendError::InvalidResponse("missing data".into());
        let import_err: ImportError = backend_err.into();
        assert!(import_err.to_string().contains("missing data"));
    }

    #[test]
    fn test_rejected_body_exposed() {
        let err = BackendError::Rejected {
            status: 400,
            body: r#"{"error":{"message":"slug must be unique"}}"#.into(),
        };
        assert!(err.to_string().contains("400"));
        assert!(err.response_body().unwrap().contains("slug must be unique"));

        let empty = BackendError::Rejected {
            status: 401,
            body: String::new(),
        };
        assert!(empty.response_body().is_none());
    }

    #[test]
    fn test_source_dir_message() {
        let err = ImportError::SourceDirMissing(PathBuf::from("/data/csv"));
        assert_eq!(err.to_string(), "CSV directory not found: /data/csv");
    }
}
