//! Canonical filename derivation.
//!
//! Pure and deterministic: the same entry and the same `today` always yield
//! the same name. The current-date fallback is an explicit parameter so
//! nothing here reads a clock.
//!
//! Shape: `{date}-{category}-{descriptor}{ext}` — date from `dateCreated`,
//! else recovered from the current filename, else `today`; category from the
//! primary keyword (categories first, then tags), else `misc`; descriptor
//! from the secondary keyword, else a slug of the title; extension preserved
//! from the current filename, lowercased.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{MISC_CATEGORY, SLUG_MAX_LEN};
use crate::types::PhotoEntry;

/// Canonical `YYYY-MM-DD` already embedded in a derived filename. Recognized
/// first so a second derivation of an already-renamed file keeps its date.
static DASHED_DATE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").ok());

/// Compact 8-digit date as cameras write it (`IMG_20230714_...`).
static COMPACT_DATE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(\d{4})(\d{2})(\d{2})").ok());

static REPEATED_HYPHENS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"-{2,}").ok());

/// Derive the canonical filename for one entry.
pub fn derive_filename(entry: &PhotoEntry, today: NaiveDate) -> String {
    let date = date_component(entry, today);

    let mut keywords = entry.keywords();
    let category = keywords
        .next()
        .map(normalize_keyword)
        .unwrap_or_else(|| MISC_CATEGORY.to_string());
    let descriptor = match keywords.next() {
        Some(keyword) => normalize_keyword(keyword),
        None => slugify(&entry.title),
    };

    let ext = entry
        .extension()
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    sanitize_filename(&format!("{date}-{category}-{descriptor}{ext}"))
}

fn date_component(entry: &PhotoEntry, today: NaiveDate) -> String {
    if let Some(date) = entry.date_created.as_deref() {
        if !date.is_empty() {
            return date.to_string();
        }
    }
    if let Some(re) = DASHED_DATE.as_ref() {
        if let Some(caps) = re.captures(&entry.filename) {
            return format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
        }
    }
    if let Some(re) = COMPACT_DATE.as_ref() {
        if let Some(caps) = re.captures(&entry.filename) {
            return format!("{}-{}-{}", &caps[1], &caps[2], &caps[3]);
        }
    }
    today.format("%Y-%m-%d").to_string()
}

fn normalize_keyword(keyword: &str) -> String {
    keyword.to_lowercase().replace(' ', "-")
}

/// Title → descriptor slug: lowercase, non-alphanumerics stripped, spaces to
/// hyphens, truncated. An unusable title yields `"image"`.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '-')
        .collect();
    let slug: String = kept.trim().replace(' ', "-").chars().take(SLUG_MAX_LEN).collect();
    if slug.is_empty() {
        "image".to_string()
    } else {
        slug
    }
}

/// Final cleanup: lowercase alphanumerics, hyphens, and the single extension
/// dot survive; repeated hyphens collapse; stray edge hyphens are trimmed.
pub fn sanitize_filename(name: &str) -> String {
    let lowered = name.to_lowercase();
    let (stem, ext) = match lowered.rsplit_once('.') {
        Some((stem, ext)) if !ext.is_empty() => (stem.to_string(), Some(ext.to_string())),
        _ => (lowered.clone(), None),
    };

    let clean_part = |part: &str| -> String {
        let kept: String = part
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();
        let collapsed = match REPEATED_HYPHENS.as_ref() {
            Some(re) => re.replace_all(&kept, "-").into_owned(),
            None => kept,
        };
        collapsed.trim_matches('-').to_string()
    };

    let stem = clean_part(&stem);
    match ext {
        Some(ext) => format!("{stem}.{}", clean_part(&ext)),
        None => stem,
    }
}
