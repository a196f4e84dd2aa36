//! Validation findings and operation reports.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Whether a finding blocks commit. Hard findings trigger rollback in the
/// executor; warnings are reported and never block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Hard,
    Warning,
}

/// Machine-readable classification of a single validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FindingCode {
    AssetDirMissing,
    MetadataFileMissing,
    MetadataUnreadable,
    ImagesArrayMissing,
    ImageFileMissing,
    DuplicateId,
    DuplicateFilename,
    OrphanedFile,
    NonStandardFilename,
    PlaceholderTitle,
    PlaceholderCaption,
    EmptyKeywords,
    UnknownKeyword,
    AspectRatioMismatch,
    InvalidDimensions,
    DuplicateSortOrder,
    NoFeatured,
    TooManyFeatured,
    InvalidDate,
}

impl FindingCode {
    /// Severity is a fixed property of the code, not a per-finding judgment.
    pub fn severity(self) -> Severity {
        match self {
            Self::AssetDirMissing
            | Self::MetadataFileMissing
            | Self::MetadataUnreadable
            | Self::ImagesArrayMissing
            | Self::ImageFileMissing
            | Self::DuplicateId
            | Self::DuplicateFilename
            | Self::OrphanedFile => Severity::Hard,
            Self::NonStandardFilename
            | Self::PlaceholderTitle
            | Self::PlaceholderCaption
            | Self::EmptyKeywords
            | Self::UnknownKeyword
            | Self::AspectRatioMismatch
            | Self::InvalidDimensions
            | Self::DuplicateSortOrder
            | Self::NoFeatured
            | Self::TooManyFeatured
            | Self::InvalidDate => Severity::Warning,
        }
    }
}

/// One validation finding: code, fixed severity, human-readable message, and
/// the photo it concerns when there is one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub code: FindingCode,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_id: Option<u32>,
}

impl Finding {
    pub fn new(code: FindingCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            photo_id: None,
        }
    }

    #[must_use]
    pub fn for_photo(mut self, id: u32) -> Self {
        self.photo_id = Some(id);
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Severity::Hard => write!(f, "issue: {}", self.message),
            Severity::Warning => write!(f, "warning: {}", self.message),
        }
    }
}

/// Outcome of one validator run over a document and its asset directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// True when no hard issue was found. Warnings do not count.
    pub fn is_clean(&self) -> bool {
        self.hard_issues().next().is_none()
    }

    pub fn hard_issues(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Hard)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
    }
}

/// Outcome of a media refresh pass over every entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshReport {
    /// Entries whose stored metadata changed.
    pub updated: usize,
    /// Filenames skipped because the backing file was missing or unreadable.
    pub skipped: Vec<String>,
}

/// Outcome of the automatic fix-up pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixReport {
    /// Human-readable description of each applied fix.
    pub changes: Vec<String>,
}

impl FixReport {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Outcome of a transactional photo removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveReport {
    pub removed_id: u32,
    pub removed_filename: String,
    /// False when the backing file was already absent and only metadata was
    /// dropped.
    pub file_deleted: bool,
    pub backup_path: PathBuf,
}

/// Outcome of regenerating the published fallback block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishReport {
    pub target: PathBuf,
    pub entries: usize,
    pub backup_path: PathBuf,
}
