//! Advisory lock around mutating operations.
//!
//! The catalog assumes a single operator; the lock exists so a second
//! concurrent invocation fails fast instead of interleaving with a running
//! transaction. The lock file itself is left in place; only the OS lock is
//! released on drop.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::debug;

use crate::error::{CatalogError, Result};

/// Exclusive advisory lock held for the duration of a mutating operation.
#[derive(Debug)]
pub struct CatalogLock {
    file: File,
    path: PathBuf,
}

impl CatalogLock {
    /// Take the lock, failing immediately with [`CatalogError::LockHeld`]
    /// when another process (or handle) already holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)?;
        file.try_lock_exclusive().map_err(|err| {
            if err.kind() == std::io::ErrorKind::WouldBlock {
                CatalogError::LockHeld(path.to_path_buf())
            } else {
                CatalogError::Io(err)
            }
        })?;
        debug!("acquired catalog lock at {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CatalogLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            debug!("failed to release catalog lock: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn second_acquire_fails_while_held() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join(".photokeep.lock");

        let held = CatalogLock::acquire(&path).unwrap();
        let err = CatalogLock::acquire(&path).unwrap_err();
        assert!(matches!(err, CatalogError::LockHeld(_)));

        drop(held);
        CatalogLock::acquire(&path).unwrap();
    }
}
