//! The "extract tags" collaborator seam.
//!
//! Re-deriving entry fields from the files on disk goes through the
//! [`MediaReader`] trait so the catalog logic never depends on any
//! particular decoder. The shipped [`DimensionProbe`] reads pixel dimensions
//! only; byte-level EXIF decoding is out of scope, and fields a reader
//! cannot know stay `None` so callers can tell "unknown" from "empty".

use std::path::Path;

use crate::error::{CatalogError, Result};
use crate::types::{Dimensions, round_ratio};

/// What a probe learned about one media file. Every field is optional: a
/// `None` means the reader has no opinion, and the existing metadata value
/// is kept.
#[derive(Debug, Clone, Default)]
pub struct MediaInfo {
    pub dimensions: Option<Dimensions>,
    pub aspect_ratio: Option<f64>,
    /// `YYYY-MM-DD`, when the source material carries a capture date.
    pub date_created: Option<String>,
    pub camera: Option<String>,
    pub lens: Option<String>,
    pub settings: Option<String>,
}

/// A source of per-file media metadata.
pub trait MediaReader {
    fn read(&self, path: &Path) -> Result<MediaInfo>;
}

/// Header-only probe: pixel dimensions and the derived aspect ratio, nothing
/// else.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionProbe;

impl MediaReader for DimensionProbe {
    fn read(&self, path: &Path) -> Result<MediaInfo> {
        let (width, height) =
            image::image_dimensions(path).map_err(|err| CatalogError::ProbeFailed {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        let dimensions = Dimensions { width, height };
        let aspect_ratio = if height > 0 {
            Some(round_ratio(f64::from(width) / f64::from(height)))
        } else {
            None
        };
        Ok(MediaInfo {
            dimensions: Some(dimensions),
            aspect_ratio,
            ..MediaInfo::default()
        })
    }
}
