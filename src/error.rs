//! Error types for kubectl-cleaner.

use crate::analyzer::cleanup::source::SourceError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for a cleaner run.
#[derive(Debug, Error)]
pub enum CleanerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Source(#[from] SourceError),

    /// Deleting from a partial report could remove Secrets or ConfigMaps
    /// whose referencing workloads were never listed.
    #[error(
        "Refusing to delete: {warnings} listing(s) failed and the report may be incomplete \
         (use --dry-run to inspect)"
    )]
    IncompleteReport { warnings: usize },

    #[error("{failed} of {total} deletion(s) failed")]
    DeletionFailed { failed: usize, total: usize },

    #[error("Deleting requires a live cluster; --from-file only supports --dry-run")]
    OfflinePurge,
}

/// Rules file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read rules file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rules file {origin}: {message}")]
    ParsingFailed { origin: String, message: String },
}

/// Result type alias for cleaner operations.
pub type Result<T> = std::result::Result<T, CleanerError>;
