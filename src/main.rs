use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};

use camkoha_importer::config::Config;
use camkoha_importer::constants::{FIRM_DETAILS_SHEET, PROJECTS_SHEET, TABLES};
use camkoha_importer::logging;
use camkoha_importer::normalize::{normalize_firms, normalize_projects};
use camkoha_importer::{CategoryLookup, Importer, RunSummary, Store, Workbook};

#[derive(Parser)]
#[command(name = "camkoha-importer")]
#[command(about = "Loads construction-project spreadsheet exports into the camkoha store")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reset the store and load every export file from the source directory
    Import {
        /// Directory holding the downloaded export files
        #[arg(long)]
        dir: Option<PathBuf>,
        /// SQLite database path
        #[arg(long)]
        db: Option<PathBuf>,
        /// Category reference artifact (JSON)
        #[arg(long)]
        categories: Option<PathBuf>,
    },
    /// Parse and normalize the export files without touching the store
    Check {
        /// Directory holding the downloaded export files
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Category reference artifact (JSON)
        #[arg(long)]
        categories: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Import { dir, db, categories } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.import.export_dir));
            let db = db.unwrap_or_else(|| PathBuf::from(&config.database.path));
            let categories =
                categories.unwrap_or_else(|| PathBuf::from(&config.import.categories_path));

            println!("📥 Importing exports from {}", dir.display());

            let lookup = CategoryLookup::load(&categories)?;
            let store = Store::open(&db)?;
            let mut importer = Importer::new(store, lookup);

            let summary = importer.run(&dir)?;
            print_summary(&summary);

            println!("\n📦 Store row counts ({}):", db.display());
            for table in TABLES {
                println!("   {:<28} {}", table, importer.store().table_count(table)?);
            }

            if summary.files_failed > 0 {
                warn!("{} file(s) failed during this run", summary.files_failed);
            }
        }
        Commands::Check { dir, categories } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.import.export_dir));
            let categories =
                categories.unwrap_or_else(|| PathBuf::from(&config.import.categories_path));

            println!("🔍 Checking exports in {}", dir.display());
            let lookup = CategoryLookup::load(&categories)?;

            let mut entries: Vec<PathBuf> = std::fs::read_dir(&dir)?
                .collect::<std::io::Result<Vec<_>>>()?
                .into_iter()
                .map(|entry| entry.path())
                .filter(|path| path.is_file())
                .collect();
            entries.sort();

            for file in entries {
                match check_file(&file, &lookup) {
                    Ok(()) => {}
                    Err(e) => println!("   ❌ {}: {e}", file.display()),
                }
            }
        }
    }
    Ok(())
}

fn check_file(file: &std::path::Path, lookup: &CategoryLookup) -> camkoha_importer::Result<()> {
    let workbook = Workbook::load(file)?;
    let projects = normalize_projects(workbook.sheet(PROJECTS_SHEET), lookup)?;
    let firms = normalize_firms(workbook.sheet(FIRM_DETAILS_SHEET))?;

    info!("Checked {}", file.display());
    println!(
        "   ✅ {}: {} projects, {} companies, {} contacts, {} category links",
        file.display(),
        projects.projects.len(),
        firms.companies.len(),
        firms.contacts.len(),
        projects.categories.len()
    );
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("\n📊 Import Results:");
    println!("   Files processed: {}", summary.files_processed);
    println!("   Files failed:    {}", summary.files_failed);
    println!("   Rows inserted:");
    for (table, count) in &summary.rows_inserted {
        println!("      {:<28} {}", table, count);
    }

    if !summary.failures.is_empty() {
        println!("\n⚠️  Failures:");
        for failure in &summary.failures {
            println!("   - {}: {}", failure.file, failure.error);
        }
    }
}
