//! Integration tests for import, removal, media refresh, the fix-up pass,
//! and vocabulary injection.

use std::path::Path;

use tempfile::{TempDir, tempdir};

use photokeep::{
    Catalog, CatalogConfig, CatalogError, DimensionProbe, ExecuteOptions, FindingCode, MediaInfo,
    MediaReader, NewPhoto, Vocabulary,
};

fn fixture(metadata: &str, files: &[&str]) -> (TempDir, CatalogConfig) {
    let tmp = tempdir().unwrap();
    let config = CatalogConfig::new(tmp.path());
    std::fs::create_dir_all(&config.images_dir).unwrap();
    std::fs::write(&config.metadata_file, metadata).unwrap();
    for file in files {
        std::fs::write(config.images_dir.join(file), format!("pixels-of-{file}")).unwrap();
    }
    (tmp, config)
}

/// A real 4x2 PNG, for exercising the dimension probe end to end.
fn write_png(path: &Path) {
    image::RgbImage::new(4, 2).save(path).unwrap();
}

const TWO_PHOTOS: &str = r#"{
  "images": [
    {"id": 1, "filename": "2024-01-02-urban-night.jpg", "title": "City Dusk",
     "caption": "Blue hour", "categories": ["urban"], "tags": ["night"],
     "dateCreated": "2024-01-02", "dimensions": {"width": 1500, "height": 1000},
     "aspectRatio": 1.5, "sortOrder": 1, "featured": true},
    {"id": 2, "filename": "2024-01-03-landscape-sunset.jpg", "title": "High Ridge",
     "caption": "Last light", "categories": ["landscape"], "tags": ["sunset"],
     "dateCreated": "2024-01-03", "dimensions": {"width": 1500, "height": 1000},
     "aspectRatio": 1.5, "sortOrder": 2, "featured": false}
  ]
}"#;

#[test]
fn add_photo_probes_copies_and_persists() {
    let (tmp, config) = fixture(r#"{"images": []}"#, &[]);
    let source = tmp.path().join("incoming.png");
    write_png(&source);

    let mut catalog = Catalog::open(config.clone()).unwrap();
    let entry = catalog
        .add_photo(
            &source,
            NewPhoto {
                title: "Harbor Crane".to_string(),
                caption: "Dawn fog".to_string(),
                categories: vec!["urban".to_string()],
                tags: vec!["candid".to_string()],
                featured: true,
                ..NewPhoto::default()
            },
            &DimensionProbe,
        )
        .unwrap();

    assert_eq!(entry.id, 1);
    assert_eq!(entry.dimensions.width, 4);
    assert_eq!(entry.dimensions.height, 2);
    assert_eq!(entry.aspect_ratio, 2.0);
    assert!(entry.filename.contains("-urban-candid"));
    assert!(entry.filename.ends_with(".png"));
    assert!(config.images_dir.join(&entry.filename).is_file());

    // The source is copied, not moved.
    assert!(source.is_file());

    let reopened = Catalog::open(config).unwrap();
    assert_eq!(reopened.document().images.len(), 1);
}

#[test]
fn add_rejects_unsupported_and_missing_sources() {
    let (tmp, config) = fixture(r#"{"images": []}"#, &[]);
    let mut catalog = Catalog::open(config).unwrap();

    let err = catalog
        .add_photo(
            &tmp.path().join("absent.jpg"),
            NewPhoto::default(),
            &DimensionProbe,
        )
        .unwrap_err();
    assert!(matches!(err, CatalogError::SourceMissing(_)));

    let text = tmp.path().join("notes.txt");
    std::fs::write(&text, b"words").unwrap();
    let err = catalog
        .add_photo(&text, NewPhoto::default(), &DimensionProbe)
        .unwrap_err();
    assert!(matches!(err, CatalogError::UnsupportedFormat(_)));
}

#[test]
fn duplicate_import_gets_a_suffixed_name() {
    let (tmp, config) = fixture(r#"{"images": []}"#, &[]);
    let source = tmp.path().join("incoming.png");
    write_png(&source);

    let mut catalog = Catalog::open(config).unwrap();
    let details = || NewPhoto {
        title: "Same Shot".to_string(),
        categories: vec!["urban".to_string()],
        ..NewPhoto::default()
    };
    let first = catalog
        .add_photo(&source, details(), &DimensionProbe)
        .unwrap();
    let second = catalog
        .add_photo(&source, details(), &DimensionProbe)
        .unwrap();

    assert_ne!(first.filename, second.filename);
    assert!(second.filename.ends_with("-1.png"), "{}", second.filename);
}

#[test]
fn remove_reindexes_ids_and_sort_orders() {
    let (_tmp, config) = fixture(
        TWO_PHOTOS,
        &[
            "2024-01-02-urban-night.jpg",
            "2024-01-03-landscape-sunset.jpg",
        ],
    );
    let mut catalog = Catalog::open(config.clone()).unwrap();

    let report = catalog
        .remove_photo(1, ExecuteOptions::confirmed())
        .unwrap();
    assert_eq!(report.removed_filename, "2024-01-02-urban-night.jpg");
    assert!(report.file_deleted);
    assert!(report.backup_path.is_dir());

    assert!(!config.images_dir.join("2024-01-02-urban-night.jpg").exists());
    let remaining = &catalog.document().images;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 1);
    assert_eq!(remaining[0].sort_order, 1);
    assert_eq!(remaining[0].filename, "2024-01-03-landscape-sunset.jpg");
    assert!(catalog.validate().is_clean());
}

#[test]
fn remove_requires_confirmation_and_a_known_id() {
    let (_tmp, config) = fixture(
        TWO_PHOTOS,
        &[
            "2024-01-02-urban-night.jpg",
            "2024-01-03-landscape-sunset.jpg",
        ],
    );
    let mut catalog = Catalog::open(config).unwrap();

    let err = catalog
        .remove_photo(1, ExecuteOptions::default())
        .unwrap_err();
    assert!(matches!(err, CatalogError::ConfirmationRequired));

    let err = catalog
        .remove_photo(99, ExecuteOptions::confirmed())
        .unwrap_err();
    assert!(matches!(err, CatalogError::PhotoNotFound(99)));
}

#[test]
fn remove_rolls_back_when_post_state_is_invalid() {
    // An orphan on disk makes any post-validation fail, so the removal must
    // restore the tree and report the rollback.
    let (_tmp, config) = fixture(
        TWO_PHOTOS,
        &[
            "2024-01-02-urban-night.jpg",
            "2024-01-03-landscape-sunset.jpg",
            "orphan.jpg",
        ],
    );
    let before = std::fs::read(&config.metadata_file).unwrap();
    let mut catalog = Catalog::open(config.clone()).unwrap();

    let err = catalog
        .remove_photo(1, ExecuteOptions::confirmed())
        .unwrap_err();
    match err {
        CatalogError::RolledBack { findings, .. } => {
            assert!(
                findings
                    .iter()
                    .any(|finding| finding.code == FindingCode::OrphanedFile)
            );
        }
        other => panic!("expected RolledBack, got {other}"),
    }

    assert_eq!(std::fs::read(&config.metadata_file).unwrap(), before);
    assert!(config.images_dir.join("2024-01-02-urban-night.jpg").is_file());
    assert_eq!(catalog.document().images.len(), 2);
}

#[test]
fn refresh_updates_stale_dimensions_from_disk() {
    let (_tmp, config) = fixture(
        r#"{"images": [
            {"id": 1, "filename": "2024-01-02-urban-night.png", "title": "City Dusk",
             "caption": "Blue hour", "categories": ["urban"], "tags": ["night"],
             "dateCreated": "2024-01-02", "dimensions": {"width": 1920, "height": 1280},
             "aspectRatio": 1.5, "sortOrder": 1, "featured": true},
            {"id": 2, "filename": "2024-01-03-landscape-sunset.png", "title": "High Ridge",
             "caption": "Last light", "categories": ["landscape"], "tags": ["sunset"],
             "dateCreated": "2024-01-03", "dimensions": {"width": 4, "height": 2},
             "aspectRatio": 2.0, "sortOrder": 2, "featured": false}
        ]}"#,
        &[],
    );
    write_png(&config.images_dir.join("2024-01-02-urban-night.png"));
    write_png(&config.images_dir.join("2024-01-03-landscape-sunset.png"));
    let mut catalog = Catalog::open(config).unwrap();

    let report = catalog.refresh_media(&DimensionProbe).unwrap();
    // Entry 2 already matched the file; only entry 1 was stale.
    assert_eq!(report.updated, 1);
    assert!(report.skipped.is_empty());

    let entry = catalog.entry(1).unwrap();
    assert_eq!(entry.dimensions.width, 4);
    assert_eq!(entry.aspect_ratio, 2.0);
}

/// A probe that refuses one specific file, for the item-level skip path.
struct FlakyProbe<'a> {
    refuse: &'a str,
}

impl MediaReader for FlakyProbe<'_> {
    fn read(&self, path: &Path) -> photokeep::Result<MediaInfo> {
        if path.to_string_lossy().contains(self.refuse) {
            return Err(CatalogError::ProbeFailed {
                path: path.to_path_buf(),
                reason: "refused".to_string(),
            });
        }
        DimensionProbe.read(path)
    }
}

#[test]
fn refresh_skips_unreadable_items_and_still_commits() {
    let (_tmp, config) = fixture(
        r#"{"images": [
            {"id": 1, "filename": "2024-01-02-urban-night.png", "title": "City Dusk",
             "caption": "Blue hour", "categories": ["urban"], "tags": ["night"],
             "dateCreated": "2024-01-02", "dimensions": {"width": 1920, "height": 1280},
             "aspectRatio": 1.5, "sortOrder": 1, "featured": true},
            {"id": 2, "filename": "2024-01-03-landscape-sunset.png", "title": "High Ridge",
             "caption": "Last light", "categories": ["landscape"], "tags": ["sunset"],
             "dateCreated": "2024-01-03", "dimensions": {"width": 1920, "height": 1280},
             "aspectRatio": 1.5, "sortOrder": 2, "featured": false}
        ]}"#,
        &[],
    );
    write_png(&config.images_dir.join("2024-01-02-urban-night.png"));
    write_png(&config.images_dir.join("2024-01-03-landscape-sunset.png"));
    let mut catalog = Catalog::open(config).unwrap();

    let report = catalog
        .refresh_media(&FlakyProbe { refuse: "landscape" })
        .unwrap();
    assert_eq!(report.updated, 1);
    assert_eq!(report.skipped, vec!["2024-01-03-landscape-sunset.png"]);

    // The refused entry kept its stored values.
    assert_eq!(catalog.entry(2).unwrap().dimensions.width, 1920);
}

#[test]
fn fix_renumbers_sort_orders_without_touching_ids() {
    let (_tmp, config) = fixture(
        r#"{"images": [
            {"id": 1, "filename": "2024-01-02-urban-night.jpg", "title": "City Dusk",
             "caption": "Blue hour", "categories": ["urban"], "tags": ["night"],
             "dimensions": {"width": 1600, "height": 800}, "aspectRatio": 1.5,
             "sortOrder": 5, "featured": true},
            {"id": 7, "filename": "2024-01-03-landscape-sunset.jpg", "title": "High Ridge",
             "caption": "Last light", "categories": ["landscape"], "tags": ["sunset"],
             "dimensions": {"width": 1500, "height": 1000}, "aspectRatio": 1.5,
             "sortOrder": 5, "featured": false}
        ]}"#,
        &[
            "2024-01-02-urban-night.jpg",
            "2024-01-03-landscape-sunset.jpg",
        ],
    );
    let mut catalog = Catalog::open(config).unwrap();

    let report = catalog.fix_document().unwrap();
    assert!(!report.is_empty());
    assert!(
        report
            .changes
            .iter()
            .any(|change| change.contains("aspectRatio"))
    );

    let doc = catalog.document();
    assert_eq!(doc.images[0].sort_order, 1);
    assert_eq!(doc.images[1].sort_order, 2);
    // Ids are only reassigned on removal.
    assert_eq!(doc.images[1].id, 7);
    // 1600x800 is 2.0, drifted from the stored 1.5.
    assert_eq!(doc.images[0].aspect_ratio, 2.0);

    // A second pass finds nothing left to fix.
    assert!(catalog.fix_document().unwrap().is_empty());
}

#[test]
fn validator_accepts_injected_vocabularies() {
    let mut vocab = Vocabulary::empty();
    vocab.extend(["astro", "deep-sky"]);
    let (_tmp, config) = fixture(
        r#"{"images": [
            {"id": 1, "filename": "2024-01-02-astro-orion.jpg", "title": "Orion",
             "caption": "Winter sky", "categories": ["astro"], "tags": ["deep-sky"],
             "dimensions": {"width": 1500, "height": 1000}, "aspectRatio": 1.5,
             "sortOrder": 1, "featured": true},
            {"id": 2, "filename": "2024-01-03-astro-pleiades.jpg", "title": "Pleiades",
             "caption": "Seven sisters", "categories": ["astro"], "tags": ["deep-sky"],
             "dimensions": {"width": 1500, "height": 1000}, "aspectRatio": 1.5,
             "sortOrder": 2, "featured": false}
        ]}"#,
        &["2024-01-02-astro-orion.jpg", "2024-01-03-astro-pleiades.jpg"],
    );
    let catalog = Catalog::open(config.with_vocabulary(vocab)).unwrap();

    let report = catalog.validate();
    assert!(report.is_clean());
    assert!(
        report
            .warnings()
            .all(|finding| finding.code != FindingCode::UnknownKeyword)
    );
}
