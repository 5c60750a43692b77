//! # strapi-import - CSV exports into Strapi
//!
//! Reads one CSV file per content type, maps columns to Strapi fields with a
//! declarative [`MappingSpec`], resolves relations by slug and creates one
//! entry per row through the REST API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  CSV File   │────▶│   Parser    │────▶│   Mapper    │────▶│   Strapi    │
//! │ (one/type)  │     │  (auto-enc) │     │ (+ resolver)│     │ POST /api/* │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strapi_import::{builtin_plan, ImportConfig, Importer, StrapiClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ImportConfig::new("./csv-imports", "http://localhost:1337")
//!         .with_token(std::env::var("STRAPI_TOKEN").ok());
//!     let client = StrapiClient::from_config(&config)?;
//!     let run = Importer::new(&config, &client).run_all(&builtin_plan()).await?;
//!     println!("Created {} entries", run.total_succeeded());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Layered error types
//! - [`config`] - Run configuration
//! - [`models`] - Rows, payloads, summaries
//! - [`parser`] - CSV parsing with auto-detection
//! - [`mapping`] - Mapping specs, transforms and the field mapper
//! - [`backend`] - Strapi client and relation resolver
//! - [`importer`] - The import driver

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Mapping
pub mod mapping;

// Backend
pub mod backend;

// Driver
pub mod importer;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{BackendError, CsvError, ImportError, PlanError, TransformError};

pub use config::{ImportConfig, DEFAULT_CSV_DIR, DEFAULT_STRAPI_URL};

pub use models::{EntryId, FieldValue, FileOutcome, FileReport, ImportSummary, Payload, Row, RunSummary};

pub use parser::{parse_bytes, parse_file, parse_str, ParseResult};

pub use mapping::{
    builtin_plan, map_row, FieldDirective, FieldMapping, FieldWarning, FileImport, ImportPlan, MappedRow,
    MappingSpec, RelationShape, Transform,
};

pub use backend::{Backend, Entry, RelationResolver, Resolve, StrapiClient};

pub use importer::Importer;
