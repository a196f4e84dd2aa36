//! Catalog lifecycle: opening a gallery tree, loading the document,
//! persisting it.
//!
//! Responsibilities:
//! - Load the JSON document, falling back to an empty default when the file
//!   is missing or unparsable — loading never fails.
//! - Persist atomically, taking a vault snapshot of the previous file first
//!   whenever one existed.
//! - Hand out the document for explicit, caller-driven mutation. The store
//!   enforces no invariants itself; operations run the validator before they
//!   report success.

use std::collections::BTreeSet;
use std::io::Write;
use std::path::Path;

use atomic_write_file::AtomicWriteFile;
use chrono::Local;
use fs_err as fs;
use log::{info, warn};

use crate::error::Result;
use crate::types::{
    CatalogConfig, Document, PhotoEntry, RenamePlan, ValidationReport,
};
use crate::vault::Vault;

use super::plan::plan_renames;
use super::validate::{image_files_in, validate_document};

/// Primary handle for one gallery tree.
///
/// Owns the configuration, the backup vault, and the exclusively-held
/// in-memory document. One instance per process; the document is mutated in
/// memory and persisted explicitly after every logical operation.
pub struct Catalog {
    pub(crate) config: CatalogConfig,
    pub(crate) vault: Vault,
    pub(crate) document: Document,
}

impl Catalog {
    /// Open a catalog rooted at the configured paths. Creates the backup
    /// directory; the gallery tree itself is never created implicitly —
    /// a missing asset directory is the validator's business.
    pub fn open(config: CatalogConfig) -> Result<Self> {
        let vault = Vault::new(&config.backup_dir);
        vault.ensure()?;
        let document = load_document(&config.metadata_file);
        Ok(Self {
            config,
            vault,
            document,
        })
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The document is the caller's to mutate; persist with [`save`](Self::save)
    /// and gate destructive flows on [`validate`](Self::validate).
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn entry(&self, id: u32) -> Option<&PhotoEntry> {
        self.document.entry(id)
    }

    /// Persist the document: snapshot the previous file when one existed,
    /// then write pretty-printed 2-space JSON atomically.
    pub fn save(&mut self) -> Result<()> {
        if self.config.metadata_file.is_file() {
            self.vault.backup_file(&self.config.metadata_file)?;
        }
        if let Some(parent) = self.config.metadata_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut payload = serde_json::to_string_pretty(&self.document)?;
        payload.push('\n');

        let mut staged = AtomicWriteFile::open(&self.config.metadata_file)?;
        staged.as_file_mut().write_all(payload.as_bytes())?;
        staged.commit()?;
        info!(
            "saved {} ({} entries)",
            self.config.metadata_file.display(),
            self.document.images.len()
        );
        Ok(())
    }

    /// Drop the in-memory document and re-load from disk. Used by the
    /// executor after a tree restore.
    pub(crate) fn reload(&mut self) {
        self.document = load_document(&self.config.metadata_file);
    }

    /// Run the integrity validator against the current in-memory state.
    pub fn validate(&self) -> ValidationReport {
        validate_document(&self.document, &self.config)
    }

    /// Compute the rename plan for the current document. On-disk files no
    /// entry references count as occupied so derived names never collide
    /// with them.
    pub fn plan_renames(&self) -> RenamePlan {
        let occupied = self.unreferenced_disk_names();
        plan_renames(&self.document, Local::now().date_naive(), &occupied)
    }

    /// Image files present on disk that no entry references.
    pub(crate) fn unreferenced_disk_names(&self) -> BTreeSet<String> {
        let referenced: BTreeSet<&str> = self
            .document
            .images
            .iter()
            .map(|entry| entry.filename.as_str())
            .collect();
        image_files_in(&self.config.images_dir)
            .into_iter()
            .filter(|name| !referenced.contains(name.as_str()))
            .collect()
    }
}

/// Load the document from disk. Missing or unparsable files yield the
/// default empty document; this function never fails. The validator reports
/// the underlying problem as a hard finding.
pub fn load_document(path: &Path) -> Document {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!("metadata not loaded ({err}); starting from empty document");
            return Document::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(document) => document,
        Err(err) => {
            warn!("metadata not parsable ({err}); starting from empty document");
            Document::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_default_document() {
        let tmp = tempdir().unwrap();
        let doc = load_document(&tmp.path().join("absent.json"));
        assert!(doc.images.is_empty());
    }

    #[test]
    fn corrupt_file_loads_default_document() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("metadata.json");
        std::fs::write(&path, "{broken").unwrap();
        assert!(load_document(&path).images.is_empty());
    }

    #[test]
    fn save_writes_pretty_two_space_json_and_backs_up_prior_file() {
        let tmp = tempdir().unwrap();
        let config = CatalogConfig::new(tmp.path());
        std::fs::create_dir_all(&config.images_dir).unwrap();
        std::fs::write(&config.metadata_file, r#"{"gallery": {}, "images": []}"#).unwrap();

        let mut catalog = Catalog::open(config.clone()).unwrap();
        catalog.document_mut().gallery.title = "Portfolio".to_string();
        catalog.save().unwrap();

        let written = std::fs::read_to_string(&config.metadata_file).unwrap();
        assert!(written.contains("  \"gallery\""), "2-space indent expected");
        assert!(written.ends_with('\n'));

        // The pre-save state landed in the vault.
        let backups: Vec<_> = std::fs::read_dir(&config.backup_dir)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert!(
            backups
                .iter()
                .any(|name| name.starts_with("metadata_") && name.ends_with(".json")),
            "{backups:?}"
        );
    }

    #[test]
    fn first_save_without_prior_file_takes_no_backup() {
        let tmp = tempdir().unwrap();
        let config = CatalogConfig::new(tmp.path());
        std::fs::create_dir_all(&config.images_dir).unwrap();

        let mut catalog = Catalog::open(config.clone()).unwrap();
        catalog.save().unwrap();

        assert!(config.metadata_file.is_file());
        let backups = std::fs::read_dir(&config.backup_dir).unwrap().count();
        assert_eq!(backups, 0);
    }
}
