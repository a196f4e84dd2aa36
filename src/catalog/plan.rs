//! Rename planning: a pure transform from a document to a reviewable plan.
//!
//! The planner never touches the disk. Collision resolution is
//! deterministic: entries are processed in document order, and a derived
//! name that is already allocated — by an earlier entry in this pass or by
//! an unreferenced file the caller found on disk — gains an incrementing
//! numeric suffix before the extension.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::types::{Document, RenameOp, RenamePlan};

use super::naming::derive_filename;

/// Compute the full rename plan for every entry, in document order.
///
/// `occupied` holds on-disk names no entry references; derived names never
/// land on them. Entries whose derived name equals their current name appear
/// as no-op pairs — the executor treats those as trivial success.
pub fn plan_renames(
    document: &Document,
    today: NaiveDate,
    occupied: &BTreeSet<String>,
) -> RenamePlan {
    let mut allocated = occupied.clone();
    let mut ops = Vec::with_capacity(document.images.len());
    let mut collisions_resolved = 0;

    for entry in &document.images {
        let derived = derive_filename(entry, today);
        let unique = if allocated.contains(&derived) {
            collisions_resolved += 1;
            disambiguate(&derived, &allocated)
        } else {
            derived
        };
        allocated.insert(unique.clone());
        ops.push(RenameOp {
            old: entry.filename.clone(),
            new: unique,
        });
    }

    RenamePlan {
        ops,
        collisions_resolved,
    }
}

/// Append `-1`, `-2`, … before the extension until the name is free. The
/// counter is unbounded; termination follows from each taken name being
/// distinct.
pub(crate) fn disambiguate(name: &str, taken: &BTreeSet<String>) -> String {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (name, String::new()),
    };
    let mut counter = 1u32;
    loop {
        let candidate = format!("{stem}-{counter}{ext}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn document(raw: &str) -> Document {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn identical_metadata_twins_get_distinct_names() {
        let doc = document(
            r#"{"images": [
                {"id": 1, "filename": "a.jpg", "categories": ["urban"], "title": "City"},
                {"id": 2, "filename": "b.jpg", "categories": ["urban"], "title": "City"}
            ]}"#,
        );
        let plan = plan_renames(&doc, today(), &BTreeSet::new());
        assert_eq!(plan.ops[0].new, "2025-06-01-urban-city.jpg");
        assert_eq!(plan.ops[1].new, "2025-06-01-urban-city-1.jpg");
        assert_eq!(plan.collisions_resolved, 1);
    }

    #[test]
    fn new_names_are_pairwise_unique() {
        let doc = document(
            r#"{"images": [
                {"id": 1, "filename": "a.jpg", "categories": ["sky"], "title": "Same"},
                {"id": 2, "filename": "b.jpg", "categories": ["sky"], "title": "Same"},
                {"id": 3, "filename": "c.jpg", "categories": ["sky"], "title": "Same"},
                {"id": 4, "filename": "d.jpg", "categories": ["sky"], "title": "Same"}
            ]}"#,
        );
        let plan = plan_renames(&doc, today(), &BTreeSet::new());
        let unique: BTreeSet<_> = plan.ops.iter().map(|op| op.new.clone()).collect();
        assert_eq!(unique.len(), plan.ops.len());
    }

    #[test]
    fn occupied_disk_names_are_never_reused() {
        let doc = document(
            r#"{"images": [
                {"id": 1, "filename": "a.jpg", "categories": ["urban"], "title": "City"}
            ]}"#,
        );
        let occupied: BTreeSet<String> =
            ["2025-06-01-urban-city.jpg".to_string()].into_iter().collect();
        let plan = plan_renames(&doc, today(), &occupied);
        assert_eq!(plan.ops[0].new, "2025-06-01-urban-city-1.jpg");
    }

    #[test]
    fn already_canonical_entries_plan_as_noops() {
        let doc = document(
            r#"{"images": [
                {"id": 1, "filename": "2025-06-01-urban-city.jpg",
                 "categories": ["urban"], "title": "City"},
                {"id": 2, "filename": "2025-06-01-urban-city-1.jpg",
                 "categories": ["urban"], "title": "City"}
            ]}"#,
        );
        let plan = plan_renames(&doc, today(), &BTreeSet::new());
        assert!(plan.ops.iter().all(crate::types::RenameOp::is_noop));
        assert!(plan.is_noop());
        assert_eq!(plan.planned_moves(), 0);
    }

    #[test]
    fn noop_pairs_still_appear_in_the_plan() {
        let doc = document(
            r#"{"images": [
                {"id": 1, "filename": "2025-06-01-urban-city.jpg",
                 "categories": ["urban"], "title": "City"}
            ]}"#,
        );
        let plan = plan_renames(&doc, today(), &BTreeSet::new());
        assert_eq!(plan.ops.len(), 1);
        assert!(plan.ops[0].is_noop());
    }
}
