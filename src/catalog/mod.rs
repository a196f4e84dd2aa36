//! Core `Catalog` type orchestrating gallery lifecycle and mutations.

pub mod execute;
pub mod lifecycle;
pub mod media;
pub mod naming;
pub mod ops;
pub mod plan;
pub mod publish;
pub mod validate;

pub use lifecycle::{Catalog, load_document};
pub use media::{DimensionProbe, MediaInfo, MediaReader};
pub use naming::{derive_filename, sanitize_filename, slugify};
pub use ops::{CatalogSummary, NewPhoto};
pub use plan::plan_renames;
pub use validate::validate_document;
