mod db;
mod export;
mod parser;
mod pipeline;
mod record;
mod settings;
mod source;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;
use tracing::info;

use crate::db::{RecordStoreSink, SqliteStore};
use crate::record::RoleCategory;
use crate::settings::Settings;
use crate::source::DirSource;

#[derive(Parser)]
#[command(name = "joblens_parser", about = "Extract job postings from saved job board pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse saved pages into the record store and a CSV export
    Parse {
        /// Directory holding the saved pages
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Only parse file names matching this regex
        #[arg(short, long)]
        pattern: Option<String>,
        /// Search category the pages were collected under
        #[arg(short, long, value_enum)]
        role: Option<RoleCategory>,
        /// Explicit role code (overrides --role)
        #[arg(long)]
        role_code: Option<String>,
        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
        /// Collection to append records to
        #[arg(short, long)]
        collection: Option<String>,
        /// CSV output path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Skip the record store
        #[arg(long)]
        no_store: bool,
        /// Skip the CSV export
        #[arg(long)]
        no_csv: bool,
        /// Print every extracted record
        #[arg(short, long)]
        verbose: bool,
    },
    /// Show how many postings a collection holds
    Stats {
        #[arg(long)]
        db: Option<PathBuf>,
        #[arg(short, long)]
        collection: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load()?;

    match cli.command {
        Commands::Parse {
            input,
            pattern,
            role,
            role_code,
            db,
            collection,
            output,
            no_store,
            no_csv,
            verbose,
        } => {
            settings.input_dir = input.unwrap_or(settings.input_dir);
            settings.file_pattern = pattern.or(settings.file_pattern);
            settings.role = role.unwrap_or(settings.role);
            settings.role_code = role_code.or(settings.role_code);
            settings.db_path = db.unwrap_or(settings.db_path);
            settings.collection = collection.unwrap_or(settings.collection);
            settings.csv_path = output.unwrap_or(settings.csv_path);
            info!(settings = ?settings, "starting parse");

            run_parse(&settings, !no_store, !no_csv, verbose)?;
        }
        Commands::Stats { db, collection } => {
            let db_path = db.unwrap_or(settings.db_path);
            let collection = collection.unwrap_or(settings.collection);
            let store = SqliteStore::open_existing(&db_path)?;
            println!("Database:   {:?}", db_path);
            println!("Collection: {}", collection);
            println!("Documents:  {}", store.count(&collection)?);
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }
    Ok(())
}

fn run_parse(settings: &Settings, to_store: bool, to_csv: bool, verbose: bool) -> Result<()> {
    let pattern = settings
        .file_pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid file pattern")?;

    let source = DirSource::new(&settings.input_dir);
    let files = source.list(pattern.as_ref())?;
    if files.is_empty() {
        println!("No files to parse in {:?}.", source.root());
        return Ok(());
    }

    println!("Parsing {} files from {:?}...", files.len(), source.root());
    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
            .progress_chars("=> "),
    );
    let outcome = pipeline::run_batch(&source, &files, &settings.role_code(), &pb);
    pb.finish_and_clear();

    if verbose {
        for record in &outcome.records {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
    }
    outcome.print();

    if outcome.records.is_empty() {
        println!("No valid postings found.");
        return Ok(());
    }

    if to_store {
        let mut store = SqliteStore::open(&settings.db_path)?;
        let n = RecordStoreSink::new(&mut store, settings.collection.as_str())
            .persist(&outcome.records)?;
        println!(
            "Inserted {} job postings into {} ({:?}, {}).",
            n,
            settings.collection,
            settings.db_path,
            store.run_id()
        );
    }

    if to_csv && export::export(&outcome.records, &settings.csv_path)? {
        println!("Job postings saved to {:?}.", settings.csv_path);
    }

    Ok(())
}
