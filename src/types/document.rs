//! The full in-memory representation of the catalog: store-level metadata
//! plus every photo entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entry::PhotoEntry;

/// Store-level metadata. Only the commonly-edited keys are typed; anything
/// else the operator keeps in the file survives a round trip through the
/// flattened map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GalleryInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The single persisted document: `{ "gallery": {...}, "images": [...] }`.
///
/// Owned exclusively by one running process; all mutation happens on this
/// value in memory and is persisted explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub gallery: GalleryInfo,
    #[serde(default)]
    pub images: Vec<PhotoEntry>,
}

impl Document {
    pub fn entry(&self, id: u32) -> Option<&PhotoEntry> {
        self.images.iter().find(|entry| entry.id == id)
    }

    pub fn entry_mut(&mut self, id: u32) -> Option<&mut PhotoEntry> {
        self.images.iter_mut().find(|entry| entry.id == id)
    }

    /// Next free id: one past the current maximum.
    pub fn next_id(&self) -> u32 {
        self.images.iter().map(|entry| entry.id).max().unwrap_or(0) + 1
    }

    /// Reassign `id` and `sortOrder` contiguously 1..N in current array
    /// order. Called after removals and by the fix-up pass.
    pub fn reindex(&mut self) -> bool {
        let mut changed = false;
        for (position, entry) in self.images.iter_mut().enumerate() {
            let expected = (position + 1) as u32;
            if entry.id != expected {
                entry.id = expected;
                changed = true;
            }
            if entry.sort_order != expected {
                entry.sort_order = expected;
                changed = true;
            }
        }
        changed
    }

    /// Reassign `sortOrder` only, contiguously 1..N in array order. The
    /// fix-up pass uses this; ids are reassigned solely after removals.
    pub fn renumber_sort_orders(&mut self) -> bool {
        let mut changed = false;
        for (position, entry) in self.images.iter_mut().enumerate() {
            let expected = (position + 1) as u32;
            if entry.sort_order != expected {
                entry.sort_order = expected;
                changed = true;
            }
        }
        changed
    }

    pub fn featured_count(&self) -> usize {
        self.images.iter().filter(|entry| entry.featured).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_gallery_keys_survive_round_trip() {
        let raw = r#"{"gallery": {"title": "Portfolio", "theme": "dark"}, "images": []}"#;
        let doc: Document = serde_json::from_str(raw).unwrap();
        assert_eq!(doc.gallery.title, "Portfolio");
        assert_eq!(doc.gallery.extra.get("theme"), Some(&Value::from("dark")));
        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"theme\":\"dark\""));
    }

    #[test]
    fn reindex_makes_ids_and_sort_orders_contiguous() {
        let mut doc: Document = serde_json::from_str(
            r#"{"images": [
                {"id": 4, "filename": "a.jpg", "sortOrder": 9},
                {"id": 7, "filename": "b.jpg", "sortOrder": 1}
            ]}"#,
        )
        .unwrap();
        assert!(doc.reindex());
        assert_eq!(doc.images[0].id, 1);
        assert_eq!(doc.images[0].sort_order, 1);
        assert_eq!(doc.images[1].id, 2);
        assert_eq!(doc.images[1].sort_order, 2);
        assert!(!doc.reindex());
    }
}
