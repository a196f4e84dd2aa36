//! Configuration and per-operation options.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::constants::{
    ASPECT_RATIO_TOLERANCE, BACKUP_DIR_NAME, BUILTIN_VOCABULARY, LOCK_FILE_NAME,
};

/// The set of known category/tag values: the built-in list plus any
/// operator-entered custom values. Injected into the validator so it can be
/// tested against arbitrary vocabularies.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    known: BTreeSet<String>,
}

impl Vocabulary {
    /// The built-in vocabulary shipped with the tool.
    pub fn builtin() -> Self {
        Self {
            known: BUILTIN_VOCABULARY.iter().map(ToString::to_string).collect(),
        }
    }

    /// An empty vocabulary; every keyword will be flagged as unknown.
    pub fn empty() -> Self {
        Self {
            known: BTreeSet::new(),
        }
    }

    /// Add operator-entered custom values.
    pub fn extend<I, S>(&mut self, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known.extend(values.into_iter().map(Into::into));
    }

    pub fn contains(&self, value: &str) -> bool {
        self.known.contains(value)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Paths and policy for one catalog. All paths derive from the root at
/// construction; builder methods override individual pieces.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base directory the tool operates in.
    pub root: PathBuf,
    /// Gallery tree: asset directory plus metadata file. This is the backup
    /// and rollback subject for transactional operations.
    pub gallery_dir: PathBuf,
    /// Flat directory of image files.
    pub images_dir: PathBuf,
    /// The persisted JSON document.
    pub metadata_file: PathBuf,
    /// Sibling directory receiving timestamped snapshots.
    pub backup_dir: PathBuf,
    /// Advisory lock file guarding mutating operations.
    pub lock_file: PathBuf,
    /// Downstream document carrying the generated fallback block.
    pub publish_target: PathBuf,
    pub vocabulary: Vocabulary,
    pub aspect_tolerance: f64,
}

impl CatalogConfig {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let gallery_dir = root.join("gallery");
        Self {
            images_dir: gallery_dir.join("images"),
            metadata_file: gallery_dir.join("metadata.json"),
            backup_dir: root.join(BACKUP_DIR_NAME),
            lock_file: root.join(LOCK_FILE_NAME),
            publish_target: root.join("photography.html"),
            gallery_dir,
            root,
            vocabulary: Vocabulary::builtin(),
            aspect_tolerance: ASPECT_RATIO_TOLERANCE,
        }
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    #[must_use]
    pub fn with_publish_target<P: AsRef<Path>>(mut self, target: P) -> Self {
        self.publish_target = target.as_ref().to_path_buf();
        self
    }

    #[must_use]
    pub fn with_aspect_tolerance(mut self, tolerance: f64) -> Self {
        self.aspect_tolerance = tolerance;
        self
    }
}

/// Options for the transactional executor. Destructive operations refuse to
/// run until `confirmed` is set; the interactive prompt lives in the CLI, the
/// enforcement lives here.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    pub confirmed: bool,
}

impl ExecuteOptions {
    /// The one way to produce a confirmed option set.
    #[must_use]
    pub fn confirmed() -> Self {
        Self { confirmed: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_vocabulary_knows_original_values() {
        let vocab = Vocabulary::builtin();
        assert!(vocab.contains("urban"));
        assert!(vocab.contains("long-exposure"));
        assert!(!vocab.contains("selfie"));
    }

    #[test]
    fn custom_values_extend_the_builtin_set() {
        let mut vocab = Vocabulary::builtin();
        vocab.extend(["selfie"]);
        assert!(vocab.contains("selfie"));
    }

    #[test]
    fn config_paths_derive_from_root() {
        let config = CatalogConfig::new("/tmp/site");
        assert_eq!(config.images_dir, PathBuf::from("/tmp/site/gallery/images"));
        assert_eq!(
            config.metadata_file,
            PathBuf::from("/tmp/site/gallery/metadata.json")
        );
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/site/.backups"));
    }
}
