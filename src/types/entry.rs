//! Typed photo-entry record and its nested value types.
//!
//! One struct, explicit optional fields, a documented default per field —
//! validated once at load time instead of defensively at every access site.

use serde::{Deserialize, Serialize};

use crate::constants::{PLACEHOLDER_CAPTIONS, PLACEHOLDER_TITLE_PREFIX, UNKNOWN_FIELD};

/// Pixel dimensions of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for Dimensions {
    /// Historical gallery default, used when nothing has probed the file yet.
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1280,
        }
    }
}

impl Dimensions {
    /// Aspect ratio rounded to two decimals, or `None` when either side is
    /// zero.
    pub fn ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(round_ratio(f64::from(self.width) / f64::from(self.height)))
    }
}

/// Round a ratio to two decimal places, the precision stored in metadata.
pub fn round_ratio(ratio: f64) -> f64 {
    (ratio * 100.0).round() / 100.0
}

/// Capture metadata (camera body, lens, exposure settings). Free text; all
/// fields default to `"Unknown"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureInfo {
    pub camera: String,
    pub lens: String,
    pub settings: String,
}

impl Default for CaptureInfo {
    fn default() -> Self {
        Self {
            camera: UNKNOWN_FIELD.to_string(),
            lens: UNKNOWN_FIELD.to_string(),
            settings: UNKNOWN_FIELD.to_string(),
        }
    }
}

impl CaptureInfo {
    pub fn is_known(value: &str) -> bool {
        !value.is_empty() && value != UNKNOWN_FIELD
    }
}

fn default_aspect_ratio() -> f64 {
    1.5
}

/// One media asset's metadata record.
///
/// `id` and `filename` are required on disk; every other field has a default
/// so partially-filled documents written by older tooling still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoEntry {
    pub id: u32,
    pub filename: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub metadata: CaptureInfo,
}

impl PhotoEntry {
    /// Categories first, then tags: the order the filename deriver consumes
    /// keywords in.
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .chain(self.tags.iter())
            .map(String::as_str)
    }

    /// Lowercased extension of the current filename, without the dot.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.filename.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }

    pub fn has_placeholder_title(&self) -> bool {
        self.title.is_empty()
            || self.title == "Untitled"
            || self.title.starts_with(PLACEHOLDER_TITLE_PREFIX)
    }

    pub fn has_placeholder_caption(&self) -> bool {
        PLACEHOLDER_CAPTIONS.contains(&self.caption.as_str())
    }
}
