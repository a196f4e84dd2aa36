//! Transactional execution of rename plans.
//!
//! The one place in the crate that performs a multi-step mutation with an
//! explicit undo path. Protocol, strictly ordered:
//!
//! 1. confirmation gate (`ExecuteOptions::confirmed`) — unconfirmed calls
//!    fail before any side effect;
//! 2. whole-tree backup of the gallery (asset directory plus metadata file);
//!    a failed backup aborts with nothing touched;
//! 3. file phase — missing sources and occupied destinations are recorded
//!    per item and skipped, never aborting the batch;
//! 4. metadata phase — filenames rewritten in the in-memory document;
//! 5. persist (which takes its own pre-save file snapshot);
//! 6. post-validation;
//! 7. commit, or whole-tree restore plus document reload.
//!
//! A mid-flight I/O error rolls back and propagates as `Err`; a
//! post-validation hard issue rolls back and is reported as a
//! `RolledBack` outcome. Once the file phase begins there is no partial or
//! cancelled state — only the final commit or rollback.

use std::path::{Path, PathBuf};

use fs_err as fs;
use log::{info, warn};

use crate::error::{CatalogError, Result};
use crate::lock::CatalogLock;
use crate::types::{
    ExecuteOptions, ExecutionStatus, RenamePlan, RenameReport, SkipReason, SkippedRename,
};

use super::lifecycle::Catalog;

impl Catalog {
    /// Apply a rename plan to the filesystem and the document as one logical
    /// unit.
    pub fn execute_renames(
        &mut self,
        plan: &RenamePlan,
        options: ExecuteOptions,
    ) -> Result<RenameReport> {
        if !options.confirmed {
            return Err(CatalogError::ConfirmationRequired);
        }
        let _lock = CatalogLock::acquire(&self.config.lock_file)?;

        let backup = self.vault.backup_tree(&self.config.gallery_dir)?;

        let mut renamed = 0usize;
        let mut skipped = Vec::new();

        let outcome: Result<()> = (|| {
            for op in &plan.ops {
                if op.is_noop() {
                    continue;
                }
                let source = self.config.images_dir.join(&op.old);
                let destination = self.config.images_dir.join(&op.new);
                if !source.is_file() {
                    warn!("source file not found, skipping: {}", op.old);
                    skipped.push(SkippedRename {
                        op: op.clone(),
                        reason: SkipReason::SourceMissing,
                    });
                    continue;
                }
                if destination.exists() {
                    warn!("destination already exists, skipping: {}", op.new);
                    skipped.push(SkippedRename {
                        op: op.clone(),
                        reason: SkipReason::DestinationExists,
                    });
                    continue;
                }
                fs::rename(&source, &destination)?;
                info!("renamed {} -> {}", op.old, op.new);
                renamed += 1;
            }

            let mapping = plan.mapping();
            for entry in &mut self.document.images {
                if let Some(new_name) = mapping.get(entry.filename.as_str()) {
                    entry.filename = (*new_name).to_string();
                }
            }

            self.save()
        })();

        match outcome {
            Ok(()) => {
                let validation = self.validate();
                if validation.is_clean() {
                    info!(
                        "rename committed: {renamed}/{} files moved",
                        plan.planned_moves()
                    );
                    Ok(RenameReport {
                        status: ExecutionStatus::Committed,
                        planned: plan.planned_moves(),
                        renamed,
                        skipped,
                        findings: validation.findings,
                        backup_path: backup,
                    })
                } else {
                    warn!(
                        "post-validation found {} hard issue(s); rolling back",
                        validation.hard_issues().count()
                    );
                    self.rollback(&backup)?;
                    Ok(RenameReport {
                        status: ExecutionStatus::RolledBack,
                        planned: plan.planned_moves(),
                        renamed: 0,
                        skipped,
                        findings: validation.findings,
                        backup_path: backup,
                    })
                }
            }
            Err(err) => {
                warn!("rename failed mid-flight ({err}); rolling back");
                self.rollback(&backup)?;
                Err(err)
            }
        }
    }

    /// Restore the gallery tree from a snapshot and reload the document from
    /// the restored metadata file.
    pub(crate) fn rollback(&mut self, backup: &Path) -> Result<()> {
        self.vault.restore_tree(backup, &self.config.gallery_dir)?;
        self.reload();
        Ok(())
    }

    /// Shared guard for the other mutating operations: backup, run the
    /// mutation, post-validate, commit or roll back.
    ///
    /// Returns the mutation's value plus the backup path on commit. A
    /// mutation error rolls back and propagates; hard validation issues roll
    /// back and surface as [`CatalogError::RolledBack`].
    pub(crate) fn transactional<T>(
        &mut self,
        mutate: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<(T, PathBuf)> {
        let backup = self.vault.backup_tree(&self.config.gallery_dir)?;
        match mutate(self) {
            Ok(value) => {
                let validation = self.validate();
                if validation.is_clean() {
                    Ok((value, backup))
                } else {
                    warn!(
                        "post-validation found {} hard issue(s); rolling back",
                        validation.hard_issues().count()
                    );
                    self.rollback(&backup)?;
                    Err(CatalogError::RolledBack {
                        findings: validation.findings,
                        backup,
                    })
                }
            }
            Err(err) => {
                warn!("mutation failed ({err}); rolling back");
                self.rollback(&backup)?;
                Err(err)
            }
        }
    }
}
