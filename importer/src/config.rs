//! Run configuration.
//!
//! Resolved once in `main` (CLI flags, environment, `.env`) and passed down
//! by reference. Nothing below `main` reads the environment.

use std::path::{Path, PathBuf};

/// Default CSV directory, relative to the working directory.
pub const DEFAULT_CSV_DIR: &str = "./csv-imports";

/// Default Strapi base URL.
///
/// Strapi's development server port.
pub const DEFAULT_STRAPI_URL: &str = "http://localhost:1337";

/// Everything the importer needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Directory holding the CSV exports.
    pub source_dir: PathBuf,
    /// Strapi base URL, without trailing slash.
    pub base_url: String,
    /// API token sent as a bearer credential.
    pub token: Option<String>,
    /// Map rows and log payloads without creating entries.
    pub dry_run: bool,
}

impl ImportConfig {
    pub fn new(source_dir: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            source_dir: source_dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            dry_run: false,
        }
    }

    /// Set the API token. Blank tokens count as no token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Path of `file` inside the source directory.
    pub fn file_path(&self, file: &str) -> PathBuf {
        self.source_dir.join(file)
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CSV_DIR, DEFAULT_STRAPI_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.base_url, "http://localhost:1337");
        assert_eq!(config.source_dir, PathBuf::from("./csv-imports"));
        assert!(config.token.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ImportConfig::new("/data", "https://cms.example.org/");
        assert_eq!(config.base_url, "https://cms.example.org");
    }

    #[test]
    fn test_blank_token_is_none() {
        let config = ImportConfig::default().with_token(Some("  ".into()));
        assert!(config.token.is_none());

        let config = ImportConfig::default().with_token(Some("abc".into()));
        assert_eq!(config.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_file_path() {
        let config = ImportConfig::new("/data/csv", DEFAULT_STRAPI_URL);
        assert_eq!(config.file_path("Blog.csv"), PathBuf::from("/data/csv/Blog.csv"));
    }
}
