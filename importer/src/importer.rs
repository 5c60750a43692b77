//! Import driver.
//!
//! Walks the plan in order, one file at a time and one row at a time.
//! Rows are never submitted concurrently: relation lookups of later rows may
//! depend on entries created by earlier ones, and the API documents no
//! concurrency limits.
//!
//! Failure scopes:
//!
//! | Scope | Cause                              | Effect                      |
//! |-------|------------------------------------|-----------------------------|
//! | Run   | CSV directory missing              | `Err`, nothing imported     |
//! | File  | Missing, unreadable or empty file  | Warning, next file          |
//! | Row   | Create rejected or transport error | Error logged, counted, next |
//! | Field | Transform failed or unresolved     | Field omitted               |

use serde_json::Value;
use tracing::{error, info, warn};

use crate::backend::{Backend, RelationResolver, Resolve};
use crate::config::ImportConfig;
use crate::error::{ImportError, ImportResult};
use crate::mapping::{map_row, FileImport, ImportPlan};
use crate::models::{FileOutcome, ImportSummary, RunSummary};
use crate::parser::parse_file;

/// Runs an [`ImportPlan`] against a [`Backend`].
pub struct Importer<'a, B: ?Sized> {
    config: &'a ImportConfig,
    backend: &'a B,
}

impl<'a, B: Backend + ?Sized> Importer<'a, B> {
    pub fn new(config: &'a ImportConfig, backend: &'a B) -> Self {
        Self { config, backend }
    }

    /// Import every file of `plan`, in plan order.
    ///
    /// Only a missing CSV directory is an error; everything else ends up in
    /// the returned summary.
    pub async fn run_all(&self, plan: &ImportPlan) -> ImportResult<RunSummary> {
        self.check_preconditions()?;

        let resolver = RelationResolver::new(self.backend);
        let mut run = RunSummary::default();

        for entry in &plan.files {
            let outcome = self.import_file(entry, &resolver).await;
            run.push(entry.file.as_str(), outcome);
        }

        info!(
            files = run.files.len(),
            attempted = run.total_attempted(),
            succeeded = run.total_succeeded(),
            "Import completed"
        );
        Ok(run)
    }

    /// Import a single configured file by name.
    ///
    /// A name the plan does not configure is skipped with a warning.
    pub async fn run_file(&self, plan: &ImportPlan, file: &str) -> ImportResult<RunSummary> {
        match plan.only(file) {
            Some(single) => self.run_all(&single).await,
            None => {
                warn!("No import configuration found for {}, skipping...", file);
                let mut run = RunSummary::default();
                run.push(file, FileOutcome::Unconfigured);
                Ok(run)
            }
        }
    }

    fn check_preconditions(&self) -> ImportResult<()> {
        if self.config.token.is_none() && !self.config.dry_run {
            warn!("No STRAPI_TOKEN provided. Authentication might fail when creating entries.");
        }

        let dir = self.config.source_dir();
        if !dir.is_dir() {
            error!(dir = %dir.display(), "CSV directory not found");
            return Err(ImportError::SourceDirMissing(dir.to_path_buf()));
        }
        Ok(())
    }

    /// Import one file: parse it eagerly, then map and submit each row.
    pub async fn import_file(&self, entry: &FileImport, resolver: &dyn Resolve) -> FileOutcome {
        let path = self.config.file_path(&entry.file);
        let content_type = entry.content_type();

        if !path.is_file() {
            warn!("File not found: {}, skipping...", path.display());
            return FileOutcome::Missing;
        }

        info!("Importing data from {}...", path.display());

        let parsed = match parse_file(&path) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Error reading file {}: {}, skipping...", path.display(), e);
                return FileOutcome::Unreadable { reason: e.to_string() };
            }
        };

        if parsed.rows.is_empty() {
            warn!("No records found in {}, skipping...", entry.file);
            return FileOutcome::Empty;
        }

        let missing = entry.spec.missing_columns(&parsed.headers);
        if !missing.is_empty() {
            warn!(
                file = %entry.file,
                "Columns not present in file, their fields will be empty: {}",
                missing.join(", ")
            );
        }

        let total = parsed.rows.len();
        info!(encoding = %parsed.encoding, "Found {} records in {}", total, entry.file);

        let mut summary = ImportSummary::new(entry.file.as_str(), content_type);

        for (index, row) in parsed.rows.iter().enumerate() {
            let n = index + 1;
            let mapped = map_row(row, &entry.spec, resolver).await;

            if self.config.dry_run {
                let body = serde_json::to_string(&mapped.payload.to_request_body()).unwrap_or_default();
                info!("[dry run] record {}/{} for {}: {}", n, total, content_type, body);
                summary.record_failure();
                continue;
            }

            match self.backend.create(content_type, &mapped.payload).await {
                Ok(id) => {
                    info!(
                        id = %id.map(|id| id.to_string()).unwrap_or_default(),
                        "Successfully imported record {}/{} into {}", n, total, content_type
                    );
                    summary.record_success();
                }
                Err(e) => {
                    error!("Error importing record {}/{} from {}: {}", n, total, entry.file, e);
                    if let Some(body) = e.response_body() {
                        error!("Response data: {}", pretty_body(body));
                    }
                    summary.record_failure();
                }
            }
        }

        info!(
            "Imported {}/{} records from {} into {}",
            summary.succeeded, summary.attempted, entry.file, content_type
        );
        FileOutcome::Imported(summary)
    }
}

/// Pretty-print a JSON error body, or return it unchanged.
fn pretty_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or_else(|_| body.to_string())
}
