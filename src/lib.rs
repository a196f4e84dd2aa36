#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(test, allow(clippy::float_cmp, clippy::uninlined_format_args))]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal, self-documenting functions don't all need
// extensive docs; public APIs should still carry them.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Cast safety: the only casts here are small positional indexes and pixel
// counts, all bounded far below the lossy range.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
//
// Ergonomics trade-offs that suit this codebase:
#![allow(clippy::must_use_candidate)]
#![allow(clippy::too_many_lines)] // the executor's protocol reads best as one function
#![allow(clippy::return_self_not_must_use)]

//! Transactional photo-catalog manager.
//!
//! A JSON document (`gallery/metadata.json`) describes a flat directory of
//! image assets. Records can be bulk-renamed to canonical names, re-derived
//! from file metadata, and regenerated into a downstream HTML block — every
//! destructive operation takes a timestamped backup first and rolls the
//! whole tree back when post-validation finds hard issues.
//!
//! ```no_run
//! use photokeep::{Catalog, CatalogConfig, ExecuteOptions};
//!
//! # fn main() -> photokeep::Result<()> {
//! let mut catalog = Catalog::open(CatalogConfig::new("."))?;
//! let plan = catalog.plan_renames();
//! let report = catalog.execute_renames(&plan, ExecuteOptions::confirmed())?;
//! assert!(report.committed());
//! # Ok(())
//! # }
//! ```

/// The photokeep crate version (matches `Cargo.toml`).
pub const PHOTOKEEP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod catalog;
pub mod constants;
pub mod error;
pub mod lock;
pub mod types;
pub mod vault;

pub use catalog::{
    Catalog, CatalogSummary, DimensionProbe, MediaInfo, MediaReader, NewPhoto, derive_filename,
    load_document, plan_renames, sanitize_filename, slugify, validate_document,
};
pub use error::{CatalogError, Result};
pub use lock::CatalogLock;
pub use types::{
    CaptureInfo, CatalogConfig, Dimensions, Document, ExecuteOptions, ExecutionStatus, Finding,
    FindingCode, FixReport, GalleryInfo, PhotoEntry, PublishReport, RefreshReport, RemoveReport,
    RenameOp, RenamePlan, RenameReport, Severity, SkipReason, SkippedRename, ValidationReport,
    Vocabulary,
};
pub use vault::Vault;
