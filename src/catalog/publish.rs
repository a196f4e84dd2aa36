//! Regeneration of the embedded fallback block in the downstream document.
//!
//! The block is delimited by explicit begin/end markers, so every publish is
//! a replace-in-place of the same region — running it twice writes the same
//! bytes twice. Missing markers are an error, never an append. Consumes the
//! store's read contract only.

use fs_err as fs;
use log::info;
use serde::Serialize;

use crate::constants::{PUBLISH_BEGIN_MARKER, PUBLISH_END_MARKER, UNKNOWN_FIELD};
use crate::error::{CatalogError, Result};
use crate::types::{Dimensions, PhotoEntry, PublishReport};

use super::lifecycle::Catalog;

/// Denormalized per-entry record embedded in the downstream document:
/// capture metadata flattened, the asset path pre-joined.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishedEntry<'a> {
    id: u32,
    filename: &'a str,
    src: String,
    title: &'a str,
    caption: &'a str,
    location: &'a str,
    camera: &'a str,
    lens: &'a str,
    settings: &'a str,
    tags: &'a [String],
    categories: &'a [String],
    featured: bool,
    sort_order: u32,
    aspect_ratio: f64,
    dimensions: Dimensions,
}

impl<'a> PublishedEntry<'a> {
    fn from_entry(entry: &'a PhotoEntry) -> Self {
        Self {
            id: entry.id,
            filename: &entry.filename,
            src: format!("gallery/images/{}", entry.filename),
            title: &entry.title,
            caption: &entry.caption,
            location: entry.location.as_deref().unwrap_or(UNKNOWN_FIELD),
            camera: &entry.metadata.camera,
            lens: &entry.metadata.lens,
            settings: &entry.metadata.settings,
            tags: &entry.tags,
            categories: &entry.categories,
            featured: entry.featured,
            sort_order: entry.sort_order,
            aspect_ratio: entry.aspect_ratio,
            dimensions: entry.dimensions,
        }
    }
}

impl Catalog {
    /// Rewrite the marker-delimited gallery block in the publish target from
    /// the current document. The target is backed up first.
    pub fn publish(&self) -> Result<PublishReport> {
        let target = self.config.publish_target.clone();
        if !target.is_file() {
            return Err(CatalogError::SourceMissing(target));
        }
        let content = fs::read_to_string(&target)?;

        let begin = content
            .find(PUBLISH_BEGIN_MARKER)
            .ok_or_else(|| CatalogError::PublishMarkersMissing(target.clone()))?;
        let end = content[begin..]
            .find(PUBLISH_END_MARKER)
            .map(|offset| begin + offset)
            .ok_or_else(|| CatalogError::PublishMarkersMissing(target.clone()))?;

        let published: Vec<PublishedEntry<'_>> = self
            .document
            .images
            .iter()
            .map(PublishedEntry::from_entry)
            .collect();
        let block = format!(
            "{PUBLISH_BEGIN_MARKER}\n<script id=\"gallery-fallback\" type=\"application/json\">\n{}\n</script>\n",
            serde_json::to_string_pretty(&published)?
        );

        let mut updated = String::with_capacity(content.len() + block.len());
        updated.push_str(&content[..begin]);
        updated.push_str(&block);
        updated.push_str(&content[end..]);

        let backup_path = self.vault.backup_file(&target)?;
        fs::write(&target, updated)?;
        info!(
            "published {} entries into {}",
            published.len(),
            target.display()
        );

        Ok(PublishReport {
            target,
            entries: published.len(),
            backup_path,
        })
    }
}
