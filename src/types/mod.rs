//! Public types exposed by the `photokeep` crate.

pub mod document;
pub mod entry;
pub mod options;
pub mod plan;
pub mod report;

pub use document::{Document, GalleryInfo};
pub use entry::{CaptureInfo, Dimensions, PhotoEntry, round_ratio};
pub use options::{CatalogConfig, ExecuteOptions, Vocabulary};
pub use plan::{
    ExecutionStatus, RenameOp, RenamePlan, RenameReport, SkipReason, SkippedRename,
};
pub use report::{
    Finding, FindingCode, FixReport, PublishReport, RefreshReport, RemoveReport, Severity,
    ValidationReport,
};
