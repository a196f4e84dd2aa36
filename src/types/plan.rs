//! Rename plans and execution reports.
//!
//! A plan is a pure, reviewable artifact: the planner computes it without
//! touching the disk, the preview command prints it, and the executor
//! consumes it verbatim.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::report::Finding;

/// One `(old, new)` filename pair. `old == new` is a valid no-op pair and is
/// treated as trivial success by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameOp {
    pub old: String,
    pub new: String,
}

impl RenameOp {
    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }
}

/// Ordered rename plan for every entry in the document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenamePlan {
    pub ops: Vec<RenameOp>,
    /// How many derived names needed a numeric suffix to become unique.
    pub collisions_resolved: usize,
}

impl RenamePlan {
    /// Number of operations that actually move a file.
    pub fn planned_moves(&self) -> usize {
        self.ops.iter().filter(|op| !op.is_noop()).count()
    }

    pub fn is_noop(&self) -> bool {
        self.planned_moves() == 0
    }

    /// old → new lookup used by the metadata phase.
    pub fn mapping(&self) -> BTreeMap<&str, &str> {
        self.ops
            .iter()
            .map(|op| (op.old.as_str(), op.new.as_str()))
            .collect()
    }
}

/// Final disposition of an executed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Mutation persisted and post-validation passed.
    Committed,
    /// A hard issue or mid-flight error occurred; the gallery tree was
    /// restored from the pre-operation backup.
    RolledBack,
}

/// Why a single rename was skipped without aborting the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    SourceMissing,
    DestinationExists,
}

/// A per-item failure recorded during the file phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedRename {
    pub op: RenameOp,
    pub reason: SkipReason,
}

/// Full account of one executor run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameReport {
    pub status: ExecutionStatus,
    /// Moves the plan called for (no-op pairs excluded).
    pub planned: usize,
    /// Files actually renamed on disk.
    pub renamed: usize,
    pub skipped: Vec<SkippedRename>,
    /// Post-validation findings; on rollback these are the findings that
    /// forced it.
    pub findings: Vec<Finding>,
    /// The pre-operation tree snapshot (also the rollback source).
    pub backup_path: PathBuf,
}

impl RenameReport {
    pub fn committed(&self) -> bool {
        self.status == ExecutionStatus::Committed
    }
}
