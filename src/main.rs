use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use photokeep::{
    Catalog, CatalogConfig, CatalogError, DimensionProbe, ExecuteOptions, Finding, NewPhoto,
    RenamePlan, RenameReport, Severity, ValidationReport,
};

#[derive(Parser)]
#[command(name = "photokeep")]
#[command(author, version, about = "Photo catalog manager with transactional renames and timestamped backups", long_about = None)]
struct Cli {
    /// Base directory containing gallery/ and .backups/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// View all photos with metadata
    List {
        /// Only photos carrying this category
        #[arg(long)]
        category: Option<String>,
        /// Only featured photos
        #[arg(long)]
        featured: bool,
    },
    /// Check catalog integrity
    Validate,
    /// Show the rename plan without touching anything
    Preview,
    /// Batch-rename assets to canonical filenames
    Rename {
        /// Show the plan only
        #[arg(long)]
        preview: bool,
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Import a new photo into the gallery
    Add {
        /// Path to the image file
        path: PathBuf,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        caption: String,
        /// May be given multiple times
        #[arg(long = "category")]
        categories: Vec<String>,
        /// May be given multiple times
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        featured: bool,
    },
    /// Remove a photo and its file, with backup
    Remove {
        /// Photo id to remove
        #[arg(long)]
        photo: u32,
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Re-derive dimensions and capture metadata from the files on disk
    Refresh,
    /// Apply automatic metadata fix-ups
    Fix,
    /// Regenerate the embedded gallery block in the publish target
    Publish {
        /// Override the configured target document
        target: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("❌ {err}");
        if let CatalogError::RolledBack { findings, .. } = &err {
            print_findings(findings);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> photokeep::Result<()> {
    let mut config = CatalogConfig::new(&cli.root);
    if let Commands::Publish {
        target: Some(target),
    } = &cli.command
    {
        config = config.with_publish_target(target);
    }
    let mut catalog = Catalog::open(config)?;

    match cli.command {
        Commands::List { category, featured } => {
            list_photos(&catalog, category.as_deref(), featured);
        }
        Commands::Validate => {
            println!("🔍 Validating catalog...");
            let report = catalog.validate();
            print_report(&report);
            if report.is_clean() {
                println!("✅ All validations passed");
            }
        }
        Commands::Preview => {
            let plan = catalog.plan_renames();
            print_plan(&plan);
        }
        Commands::Rename { preview, yes } => {
            let plan = catalog.plan_renames();
            print_plan(&plan);
            if preview {
                return Ok(());
            }
            if plan.is_noop() {
                println!("✅ All filenames already canonical");
                return Ok(());
            }
            let prompt = format!(
                "About to rename {} file(s). This modifies the gallery. Continue?",
                plan.planned_moves()
            );
            if !yes && !confirm(&prompt)? {
                println!("Operation cancelled.");
                return Ok(());
            }
            let report = catalog.execute_renames(&plan, ExecuteOptions::confirmed())?;
            print_rename_report(&report);
        }
        Commands::Add {
            path,
            title,
            caption,
            categories,
            tags,
            location,
            featured,
        } => {
            let details = NewPhoto {
                title,
                caption,
                categories,
                tags,
                location,
                featured,
            };
            let entry = catalog.add_photo(&path, details, &DimensionProbe)?;
            println!("✅ Added photo {} as {}", entry.id, entry.filename);
        }
        Commands::Remove { photo, yes } => {
            let entry = catalog
                .entry(photo)
                .ok_or(CatalogError::PhotoNotFound(photo))?;
            println!("📷 {} ({})", entry.title, entry.filename);
            let prompt = "This permanently removes the photo and its file. Continue?";
            if !yes && !confirm(prompt)? {
                println!("Operation cancelled.");
                return Ok(());
            }
            let report = catalog.remove_photo(photo, ExecuteOptions::confirmed())?;
            println!(
                "✅ Removed photo {} ({}); backup at {}",
                report.removed_id,
                report.removed_filename,
                report.backup_path.display()
            );
            if !report.file_deleted {
                println!("⚠️  File was already absent; only metadata was dropped");
            }
        }
        Commands::Refresh => {
            let report = catalog.refresh_media(&DimensionProbe)?;
            println!(
                "✅ Refreshed media info: {} updated, {} skipped",
                report.updated,
                report.skipped.len()
            );
            for name in &report.skipped {
                println!("⚠️  skipped {name}");
            }
        }
        Commands::Fix => {
            let report = catalog.fix_document()?;
            if report.is_empty() {
                println!("✅ No fixable issues found");
            } else {
                for change in &report.changes {
                    println!("  ✅ {change}");
                }
                println!("✅ Fixed {} issue(s)", report.changes.len());
            }
        }
        Commands::Publish { .. } => {
            let report = catalog.publish()?;
            println!(
                "✅ Published {} entries into {}",
                report.entries,
                report.target.display()
            );
        }
    }
    Ok(())
}

fn list_photos(catalog: &Catalog, category: Option<&str>, featured_only: bool) {
    let photos: Vec<_> = catalog
        .document()
        .images
        .iter()
        .filter(|entry| {
            category.is_none_or(|wanted| entry.categories.iter().any(|c| c == wanted))
        })
        .filter(|entry| !featured_only || entry.featured)
        .collect();

    if photos.is_empty() {
        println!("No photos found matching criteria.");
        return;
    }

    let rule = "=".repeat(100);
    println!("{rule}");
    println!("PHOTO CATALOG - {} PHOTOS", photos.len());
    println!("{rule}");
    println!(
        "{:<4} {:<38} {:<26} {:<30}",
        "ID", "FILENAME", "TITLE", "CATEGORIES"
    );
    println!("{rule}");
    for entry in &photos {
        println!(
            "{:<4} {:<38} {:<26} {:<30}",
            entry.id,
            truncate(&entry.filename, 36),
            truncate(&entry.title, 24),
            truncate(&entry.categories.join(", "), 28),
        );
    }
    println!("{rule}");

    let summary = catalog.summary();
    println!(
        "Total photos: {} | Featured: {}",
        summary.total, summary.featured
    );
    let categories: Vec<String> = summary
        .categories
        .iter()
        .map(|(name, count)| format!("{name}({count})"))
        .collect();
    println!("Categories: {}", categories.join(", "));
}

fn print_plan(plan: &RenamePlan) {
    let rule = "=".repeat(80);
    println!("{rule}");
    println!("RENAME PLAN");
    println!("{rule}");
    for (index, op) in plan.ops.iter().enumerate() {
        let marker = if op.is_noop() { "=" } else { "→" };
        println!(
            "{:<4} {:<36} {marker} {:<36}",
            index + 1,
            truncate(&op.old, 34),
            truncate(&op.new, 34)
        );
    }
    println!("{rule}");
    println!("Files to rename: {}", plan.planned_moves());
    if plan.collisions_resolved > 0 {
        println!(
            "⚠️  {} naming conflict(s) resolved with suffixes",
            plan.collisions_resolved
        );
    }
}

fn print_rename_report(report: &RenameReport) {
    for skip in &report.skipped {
        println!(
            "⚠️  skipped {} → {} ({:?})",
            skip.op.old, skip.op.new, skip.reason
        );
    }
    if report.committed() {
        println!(
            "✅ Rename committed: {}/{} files renamed",
            report.renamed, report.planned
        );
        print_findings(&report.findings);
    } else {
        println!(
            "❌ Validation failed after rename; rolled back to {}",
            report.backup_path.display()
        );
        print_findings(&report.findings);
    }
}

fn print_report(report: &ValidationReport) {
    print_findings(&report.findings);
    let hard = report.hard_issues().count();
    if hard > 0 {
        println!("Total issues: {hard}");
    }
}

fn print_findings(findings: &[Finding]) {
    for finding in findings {
        match finding.severity {
            Severity::Hard => println!("  ❌ {}", finding.message),
            Severity::Warning => println!("  ⚠️  {}", finding.message),
        }
    }
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("⚠️  {prompt} (yes/no): ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "yes" || answer == "y")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
