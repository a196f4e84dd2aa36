//! Crate-wide error type and `Result` alias.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Finding;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Everything that can go wrong while operating on a catalog.
///
/// Item-level rename failures (missing source, occupied destination) are not
/// errors: they are recorded per item in a [`RenameReport`](crate::types::RenameReport)
/// while the batch continues. Post-mutation validation failures are likewise
/// reported, not raised; the executor rolls back and returns a report.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("metadata (de)serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Backup creation failed before a destructive operation. The operation
    /// never started; no files or metadata were touched.
    #[error("backup of {path} failed: {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Restoring from a backup snapshot failed. Manual recovery from the
    /// named snapshot is required.
    #[error("restore from {backup} failed: {source}")]
    RestoreFailed {
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Post-mutation validation reported hard issues; the gallery tree was
    /// restored from the named backup before this was returned.
    #[error("mutation rolled back to {} ({} hard validation issue(s))", backup.display(), findings.len())]
    RolledBack {
        findings: Vec<Finding>,
        backup: PathBuf,
    },

    #[error("another operation holds the catalog lock ({0})")]
    LockHeld(PathBuf),

    #[error("no photo with id {0}")]
    PhotoNotFound(u32),

    #[error("unsupported media format: {0}")]
    UnsupportedFormat(String),

    #[error("source file not found: {0}")]
    SourceMissing(PathBuf),

    /// Destructive operations require an explicit confirmation flag; the
    /// library never mutates the gallery silently.
    #[error("operation not confirmed; pass ExecuteOptions::confirmed()")]
    ConfirmationRequired,

    #[error("publish target {0} has no generated-block markers")]
    PublishMarkersMissing(PathBuf),

    #[error("media probe failed for {path}: {reason}")]
    ProbeFailed { path: PathBuf, reason: String },
}
