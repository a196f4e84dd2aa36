//! Shared constants: naming conventions, tolerances, and the built-in
//! category vocabulary.

/// File extensions (lowercase, without dot) accepted in the asset directory.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Maximum allowed drift between a stored aspect ratio and the ratio
/// recomputed from the stored dimensions.
pub const ASPECT_RATIO_TOLERANCE: f64 = 0.1;

/// Maximum length of the title-derived descriptor slug in a canonical
/// filename.
pub const SLUG_MAX_LEN: usize = 15;

/// Fallback category component when an entry has no categories or tags.
pub const MISC_CATEGORY: &str = "misc";

/// Value capture-metadata fields default to when nothing better is known.
pub const UNKNOWN_FIELD: &str = "Unknown";

/// Timestamp layout used for backup names. Second resolution; two backups of
/// the same subject within one second collide, which is accepted rather than
/// handled.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the backup directory, a sibling of the gallery tree.
pub const BACKUP_DIR_NAME: &str = ".backups";

/// Advisory lock file guarding mutating operations.
pub const LOCK_FILE_NAME: &str = ".photokeep.lock";

/// Title prefix that marks an auto-generated placeholder title.
pub const PLACEHOLDER_TITLE_PREFIX: &str = "Image ";

/// Captions that count as never-edited placeholders.
pub const PLACEHOLDER_CAPTIONS: &[&str] = &["", "Image Caption"];

/// Markers delimiting the machine-written gallery block in the publish
/// target. Everything between them is replaced wholesale on every publish.
pub const PUBLISH_BEGIN_MARKER: &str = "<!-- photokeep:gallery-data:begin -->";
pub const PUBLISH_END_MARKER: &str = "<!-- photokeep:gallery-data:end -->";

/// Built-in category/tag vocabulary. Operator-entered custom values extend
/// this set through [`Vocabulary`](crate::types::Vocabulary); the validator
/// never hard-codes it.
pub const BUILTIN_VOCABULARY: &[&str] = &[
    "urban",
    "cityscape",
    "golden-hour",
    "architecture",
    "evening",
    "night",
    "fireworks",
    "celebration",
    "long-exposure",
    "landscape",
    "mountains",
    "sunset",
    "panoramic",
    "sky",
    "clouds",
    "dramatic",
    "serene",
    "golden-light",
    "abstract",
    "light",
    "artistic",
    "natural",
    "peaceful",
    "mystery",
    "low-light",
    "geometric",
    "modern",
    "patterns",
    "contemporary",
    "street",
    "candid",
    "urban-life",
    "people",
    "hue",
    "sun",
    "heaven",
    "outskirts",
    "road-trip",
    "lightning",
    "before-rain",
    "death",
    "after-rain",
    "road",
    "water",
];
