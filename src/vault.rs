//! Timestamped, point-in-time snapshots of files and directory trees.
//!
//! Responsibilities:
//! - Produce an immutable copy of a file or a whole tree before any
//!   destructive operation.
//! - Restore a tree snapshot wholesale on the executor's failure path.
//!
//! Backup names carry a second-resolution timestamp. Two backups of the same
//! subject within one second collide; that is an accepted limitation, not a
//! handled case.

use std::path::{Path, PathBuf};

use chrono::Local;
use fs_err as fs;
use log::info;

use crate::constants::BACKUP_TIMESTAMP_FORMAT;
use crate::error::{CatalogError, Result};

/// Creates and restores snapshots under one backup root (`.backups/`).
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
}

impl Vault {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the backup root if it does not exist yet.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Copy a single file to `{stem}_{YYYYMMDD_HHMMSS}{.ext}` inside the
    /// backup root and return the snapshot path.
    pub fn backup_file(&self, path: &Path) -> Result<PathBuf> {
        self.ensure()?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let backup = self
            .root
            .join(format!("{stem}_{}{ext}", timestamp()));
        fs::copy(path, &backup).map_err(|source| CatalogError::BackupFailed {
            path: path.to_path_buf(),
            source,
        })?;
        info!("backed up {} to {}", path.display(), backup.display());
        Ok(backup)
    }

    /// Recursively copy a directory to `{name}_backup_{YYYYMMDD_HHMMSS}/`
    /// inside the backup root and return the snapshot path.
    pub fn backup_tree(&self, dir: &Path) -> Result<PathBuf> {
        self.ensure()?;
        let name = dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "tree".to_string());
        let backup = self
            .root
            .join(format!("{name}_backup_{}", timestamp()));
        copy_dir_all(dir, &backup).map_err(|source| CatalogError::BackupFailed {
            path: dir.to_path_buf(),
            source,
        })?;
        info!("backed up {} to {}", dir.display(), backup.display());
        Ok(backup)
    }

    /// Replace `target` wholesale with the contents of `backup`.
    ///
    /// Destructive to the target tree. Only the executor's failure path may
    /// call this.
    pub fn restore_tree(&self, backup: &Path, target: &Path) -> Result<()> {
        let restore = || -> std::io::Result<()> {
            if target.exists() {
                fs::remove_dir_all(target)?;
            }
            copy_dir_all(backup, target)
        };
        restore().map_err(|source| CatalogError::RestoreFailed {
            backup: backup.to_path_buf(),
            source,
        })?;
        info!("restored {} from {}", target.display(), backup.display());
        Ok(())
    }
}

fn timestamp() -> String {
    Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string()
}

fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let dest = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}
