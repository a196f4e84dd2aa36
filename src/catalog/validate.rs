//! Consistency checks over the document and the asset directory.
//!
//! Read-only: the validator inspects the filesystem and the document and
//! accumulates findings, it never repairs anything. Hard findings block
//! commit (the executor rolls back on them); warnings never do.
//!
//! Structural checks (file present, parsable, `images` array present) run
//! against the raw on-disk JSON, because the typed loader papers over those
//! states with defaults.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDate;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::constants::IMAGE_EXTENSIONS;
use crate::types::{CatalogConfig, Document, Finding, FindingCode, ValidationReport};

/// Canonical filename shape: date, at least two keyword groups, a known
/// image extension.
static CANONICAL_FILENAME: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}(?:-[a-z0-9]+){2,}\.(?:jpg|jpeg|png|webp)$").ok()
});

/// Run the full battery of checks.
pub fn validate_document(document: &Document, config: &CatalogConfig) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !config.images_dir.is_dir() {
        report.push(Finding::new(
            FindingCode::AssetDirMissing,
            format!("asset directory missing: {}", config.images_dir.display()),
        ));
        return report;
    }

    if !check_structure(&config.metadata_file, &mut report) {
        return report;
    }

    for entry in &document.images {
        check_entry(entry, config, &mut report);
    }

    check_duplicates(document, &mut report);
    check_orphans(document, &config.images_dir, &mut report);
    check_featured_balance(document, &mut report);

    report
}

/// Raw structural pass over the on-disk JSON. Returns false when the rest of
/// the battery cannot meaningfully run.
fn check_structure(metadata_file: &Path, report: &mut ValidationReport) -> bool {
    if !metadata_file.is_file() {
        report.push(Finding::new(
            FindingCode::MetadataFileMissing,
            format!("metadata file missing: {}", metadata_file.display()),
        ));
        return false;
    }
    let raw = match fs_err::read_to_string(metadata_file) {
        Ok(raw) => raw,
        Err(err) => {
            report.push(Finding::new(
                FindingCode::MetadataUnreadable,
                format!("metadata file unreadable: {err}"),
            ));
            return false;
        }
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => {
            if value.get("images").map_or(true, |images| !images.is_array()) {
                report.push(Finding::new(
                    FindingCode::ImagesArrayMissing,
                    "metadata document has no 'images' array",
                ));
                return false;
            }
            true
        }
        Err(err) => {
            report.push(Finding::new(
                FindingCode::MetadataUnreadable,
                format!("metadata file is not valid JSON: {err}"),
            ));
            false
        }
    }
}

fn check_entry(
    entry: &crate::types::PhotoEntry,
    config: &CatalogConfig,
    report: &mut ValidationReport,
) {
    if !config.images_dir.join(&entry.filename).is_file() {
        report.push(
            Finding::new(
                FindingCode::ImageFileMissing,
                format!("image file missing: {}", entry.filename),
            )
            .for_photo(entry.id),
        );
    }

    if let Some(re) = CANONICAL_FILENAME.as_ref() {
        if !re.is_match(&entry.filename.to_lowercase()) {
            report.push(
                Finding::new(
                    FindingCode::NonStandardFilename,
                    format!("non-standard filename format: {}", entry.filename),
                )
                .for_photo(entry.id),
            );
        }
    }

    if entry.has_placeholder_title() {
        report.push(
            Finding::new(
                FindingCode::PlaceholderTitle,
                format!("generic title '{}' on {}", entry.title, entry.filename),
            )
            .for_photo(entry.id),
        );
    }
    if entry.has_placeholder_caption() {
        report.push(
            Finding::new(
                FindingCode::PlaceholderCaption,
                format!("generic caption on {}", entry.filename),
            )
            .for_photo(entry.id),
        );
    }

    if entry.keywords().next().is_none() {
        report.push(
            Finding::new(
                FindingCode::EmptyKeywords,
                format!("no categories or tags assigned to {}", entry.filename),
            )
            .for_photo(entry.id),
        );
    } else {
        for keyword in entry.keywords() {
            if !config.vocabulary.contains(keyword) {
                report.push(
                    Finding::new(
                        FindingCode::UnknownKeyword,
                        format!("unknown category/tag '{keyword}' on {}", entry.filename),
                    )
                    .for_photo(entry.id),
                );
            }
        }
    }

    match entry.dimensions.ratio() {
        Some(calculated) => {
            if (calculated - entry.aspect_ratio).abs() > config.aspect_tolerance {
                report.push(
                    Finding::new(
                        FindingCode::AspectRatioMismatch,
                        format!(
                            "aspect ratio mismatch for {}: calculated {calculated}, stored {}",
                            entry.filename, entry.aspect_ratio
                        ),
                    )
                    .for_photo(entry.id),
                );
            }
        }
        None => {
            report.push(
                Finding::new(
                    FindingCode::InvalidDimensions,
                    format!(
                        "degenerate dimensions {}x{} on {}",
                        entry.dimensions.width, entry.dimensions.height, entry.filename
                    ),
                )
                .for_photo(entry.id),
            );
        }
    }

    if let Some(date) = entry.date_created.as_deref() {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            report.push(
                Finding::new(
                    FindingCode::InvalidDate,
                    format!("dateCreated '{date}' on {} is not YYYY-MM-DD", entry.filename),
                )
                .for_photo(entry.id),
            );
        }
    }
}

fn check_duplicates(document: &Document, report: &mut ValidationReport) {
    let mut ids: BTreeMap<u32, usize> = BTreeMap::new();
    let mut filenames: BTreeMap<&str, usize> = BTreeMap::new();
    let mut sort_orders: BTreeMap<u32, usize> = BTreeMap::new();
    for entry in &document.images {
        *ids.entry(entry.id).or_default() += 1;
        *filenames.entry(entry.filename.as_str()).or_default() += 1;
        *sort_orders.entry(entry.sort_order).or_default() += 1;
    }

    for (id, count) in ids {
        if count > 1 {
            report.push(Finding::new(
                FindingCode::DuplicateId,
                format!("id {id} used by {count} entries"),
            ));
        }
    }
    for (filename, count) in filenames {
        if count > 1 {
            report.push(Finding::new(
                FindingCode::DuplicateFilename,
                format!("filename '{filename}' used by {count} entries"),
            ));
        }
    }
    for (order, count) in sort_orders {
        if count > 1 {
            report.push(Finding::new(
                FindingCode::DuplicateSortOrder,
                format!("sort order {order} used by {count} entries"),
            ));
        }
    }
}

fn check_orphans(document: &Document, images_dir: &Path, report: &mut ValidationReport) {
    let referenced: BTreeSet<&str> = document
        .images
        .iter()
        .map(|entry| entry.filename.as_str())
        .collect();
    for name in image_files_in(images_dir) {
        if !referenced.contains(name.as_str()) {
            report.push(Finding::new(
                FindingCode::OrphanedFile,
                format!("orphaned file on disk: {name}"),
            ));
        }
    }
}

fn check_featured_balance(document: &Document, report: &mut ValidationReport) {
    let total = document.images.len();
    if total == 0 {
        return;
    }
    let featured = document.featured_count();
    if featured == 0 {
        report.push(Finding::new(
            FindingCode::NoFeatured,
            "no featured photos selected",
        ));
    } else if featured * 2 > total {
        report.push(Finding::new(
            FindingCode::TooManyFeatured,
            format!("too many featured photos ({featured}/{total})"),
        ));
    }
}

/// Image files (by extension) present in a directory. Shared with the
/// planner's occupied-name collection.
pub(crate) fn image_files_in(dir: &Path) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let entries = match fs_err::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("cannot list {}: {err}", dir.display());
            return names;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let has_image_ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
        if has_image_ext {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names
}
