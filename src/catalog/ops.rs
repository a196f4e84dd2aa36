//! Catalog operations beyond renaming: import, removal, media refresh, the
//! automatic fix-up pass, and read-side summaries.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::Local;
use fs_err as fs;
use log::{info, warn};

use crate::constants::IMAGE_EXTENSIONS;
use crate::error::{CatalogError, Result};
use crate::lock::CatalogLock;
use crate::types::{
    CaptureInfo, ExecuteOptions, FixReport, PhotoEntry, RefreshReport, RemoveReport,
};

use super::lifecycle::Catalog;
use super::media::{MediaInfo, MediaReader};
use super::naming::derive_filename;
use super::plan::disambiguate;
use super::validate::image_files_in;

/// Stored and recomputed ratios are both rounded to two decimals; anything
/// past this is real drift, not float noise.
const RATIO_FIX_EPSILON: f64 = 0.005;

/// Operator-provided fields for a newly imported photo. Everything the probe
/// can find out is filled in automatically.
#[derive(Debug, Clone, Default)]
pub struct NewPhoto {
    pub title: String,
    pub caption: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub featured: bool,
}

/// Read-side roll-up for the `list` surface.
#[derive(Debug, Clone, Default)]
pub struct CatalogSummary {
    pub total: usize,
    pub featured: usize,
    pub categories: BTreeMap<String, usize>,
}

impl Catalog {
    /// Import an external image: probe it, derive a canonical unique
    /// filename, copy it into the asset directory, append a new entry, and
    /// persist.
    pub fn add_photo(
        &mut self,
        source: &Path,
        details: NewPhoto,
        reader: &dyn MediaReader,
    ) -> Result<PhotoEntry> {
        if !source.is_file() {
            return Err(CatalogError::SourceMissing(source.to_path_buf()));
        }
        let ext = source
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(CatalogError::UnsupportedFormat(ext));
        }
        let _lock = CatalogLock::acquire(&self.config.lock_file)?;

        let info = match reader.read(source) {
            Ok(info) => info,
            Err(err) => {
                warn!("media probe failed ({err}); using defaults");
                MediaInfo::default()
            }
        };

        let id = self.document.next_id();
        let today = Local::now().date_naive();
        let dimensions = info.dimensions.unwrap_or_default();
        let mut entry = PhotoEntry {
            id,
            // Temporary: the deriver reads the extension off this name.
            filename: source
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| format!("photo.{ext}")),
            title: if details.title.is_empty() {
                format!("Photo {id}")
            } else {
                details.title
            },
            caption: if details.caption.is_empty() {
                "Professional photography".to_string()
            } else {
                details.caption
            },
            categories: details.categories,
            tags: details.tags,
            aspect_ratio: info
                .aspect_ratio
                .or_else(|| dimensions.ratio())
                .unwrap_or(1.5),
            dimensions,
            sort_order: id,
            featured: details.featured,
            date_created: Some(
                info.date_created
                    .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
            ),
            location: details.location,
            metadata: CaptureInfo {
                camera: info.camera.unwrap_or_else(|| CaptureInfo::default().camera),
                lens: info.lens.unwrap_or_else(|| CaptureInfo::default().lens),
                settings: info
                    .settings
                    .unwrap_or_else(|| CaptureInfo::default().settings),
            },
        };

        // Unique against both the document and whatever sits on disk.
        let mut taken: BTreeSet<String> = self
            .document
            .images
            .iter()
            .map(|existing| existing.filename.clone())
            .collect();
        taken.extend(image_files_in(&self.config.images_dir));
        let derived = derive_filename(&entry, today);
        entry.filename = if taken.contains(&derived) {
            disambiguate(&derived, &taken)
        } else {
            derived
        };

        fs::create_dir_all(&self.config.images_dir)?;
        fs::copy(source, self.config.images_dir.join(&entry.filename))?;
        info!("imported {} as {}", source.display(), entry.filename);

        self.document.images.push(entry.clone());
        self.save()?;
        Ok(entry)
    }

    /// Transactionally remove a photo: delete its file, drop its entry,
    /// reassign ids and sort orders contiguously, persist, post-validate.
    pub fn remove_photo(&mut self, id: u32, options: ExecuteOptions) -> Result<RemoveReport> {
        if !options.confirmed {
            return Err(CatalogError::ConfirmationRequired);
        }
        let target = self
            .document
            .entry(id)
            .cloned()
            .ok_or(CatalogError::PhotoNotFound(id))?;
        let _lock = CatalogLock::acquire(&self.config.lock_file)?;

        let (file_deleted, backup) = self.transactional(|catalog| {
            let path = catalog.config.images_dir.join(&target.filename);
            let deleted = if path.is_file() {
                fs::remove_file(&path)?;
                true
            } else {
                warn!("file already absent: {}", target.filename);
                false
            };
            catalog.document.images.retain(|entry| entry.id != id);
            catalog.document.reindex();
            catalog.save()?;
            Ok(deleted)
        })?;

        info!("removed photo {id} ({})", target.filename);
        Ok(RemoveReport {
            removed_id: id,
            removed_filename: target.filename,
            file_deleted,
            backup_path: backup,
        })
    }

    /// Re-derive media-backed fields for every entry through the probe.
    /// Missing or unreadable files are skipped per item; the pass itself is
    /// transactional.
    pub fn refresh_media(&mut self, reader: &dyn MediaReader) -> Result<RefreshReport> {
        let _lock = CatalogLock::acquire(&self.config.lock_file)?;

        let (report, _backup) = self.transactional(|catalog| {
            let images_dir = catalog.config.images_dir.clone();
            let mut report = RefreshReport::default();
            for entry in &mut catalog.document.images {
                let path = images_dir.join(&entry.filename);
                if !path.is_file() {
                    warn!("file missing, skipping: {}", entry.filename);
                    report.skipped.push(entry.filename.clone());
                    continue;
                }
                match reader.read(&path) {
                    Ok(info) => {
                        if apply_media_info(entry, &info) {
                            report.updated += 1;
                        }
                    }
                    Err(err) => {
                        warn!("probe failed for {} ({err}), skipping", entry.filename);
                        report.skipped.push(entry.filename.clone());
                    }
                }
            }
            if report.updated > 0 {
                catalog.save()?;
            }
            Ok(report)
        })?;

        info!(
            "media refresh: {} updated, {} skipped",
            report.updated,
            report.skipped.len()
        );
        Ok(report)
    }

    /// Automatic fix-up pass: recompute stale aspect ratios from dimensions
    /// and renumber sort orders contiguously. Persists only when something
    /// changed.
    pub fn fix_document(&mut self) -> Result<FixReport> {
        let _lock = CatalogLock::acquire(&self.config.lock_file)?;

        let mut report = FixReport::default();
        for entry in &mut self.document.images {
            if let Some(calculated) = entry.dimensions.ratio() {
                if (calculated - entry.aspect_ratio).abs() > RATIO_FIX_EPSILON {
                    entry.aspect_ratio = calculated;
                    report
                        .changes
                        .push(format!("recomputed aspectRatio for {}", entry.filename));
                }
            }
        }
        if self.document.renumber_sort_orders() {
            report
                .changes
                .push("renumbered sort orders contiguously".to_string());
        }

        if !report.is_empty() {
            self.save()?;
        }
        Ok(report)
    }

    pub fn summary(&self) -> CatalogSummary {
        let mut summary = CatalogSummary {
            total: self.document.images.len(),
            featured: self.document.featured_count(),
            categories: BTreeMap::new(),
        };
        for entry in &self.document.images {
            for category in &entry.categories {
                *summary.categories.entry(category.clone()).or_default() += 1;
            }
        }
        summary
    }
}

/// Fold probe results into an entry. Returns whether anything changed. `None`
/// probe fields and `"Unknown"` probe values never overwrite stored data; a
/// probe date only fills an absent one.
fn apply_media_info(entry: &mut PhotoEntry, info: &MediaInfo) -> bool {
    let mut changed = false;
    if let Some(dimensions) = info.dimensions {
        if dimensions.width > 0 && dimensions.height > 0 && dimensions != entry.dimensions {
            entry.dimensions = dimensions;
            if let Some(ratio) = info.aspect_ratio.or_else(|| dimensions.ratio()) {
                entry.aspect_ratio = ratio;
            }
            changed = true;
        }
    }
    if let Some(camera) = &info.camera {
        if CaptureInfo::is_known(camera) && entry.metadata.camera != *camera {
            entry.metadata.camera = camera.clone();
            changed = true;
        }
    }
    if let Some(lens) = &info.lens {
        if CaptureInfo::is_known(lens) && entry.metadata.lens != *lens {
            entry.metadata.lens = lens.clone();
            changed = true;
        }
    }
    if let Some(settings) = &info.settings {
        if CaptureInfo::is_known(settings) && entry.metadata.settings != *settings {
            entry.metadata.settings = settings.clone();
            changed = true;
        }
    }
    if entry.date_created.is_none() {
        if let Some(date) = &info.date_created {
            entry.date_created = Some(date.clone());
            changed = true;
        }
    }
    changed
}
