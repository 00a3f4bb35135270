// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up diagnostic logging on stderr
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = clean, 1 = problems found, 2 = error)
// =============================================================================

mod checker; // src/checker/ - link extraction and checking
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - explicit run configuration
mod dataset; // src/dataset/ - JSON loading and integrity checks
mod report; // src/report.rs - link report aggregation

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use checker::SourceLinks;
use cli::{Cli, Commands, DataArgs, LinksArgs};
use config::{CheckOptions, DataPaths};
use report::ValidationReport;

const EXIT_CLEAN: i32 = 0;
const EXIT_PROBLEMS: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Links(args) => handle_links(&args).await,
        Commands::Data(args) => handle_data(&args),
    }
}

// RUST_LOG wins when set; otherwise -v / -vv pick the level
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Handles the 'links' subcommand
async fn handle_links(args: &LinksArgs) -> Result<i32> {
    let opts = args.check_options();
    tracing::debug!(options = ?opts, "link check configuration");
    validate_links(&args.input_files(), &opts, args.json).await
}

// Loads each file, extracts its links and checks them all in one pool
//
// A file that can't be loaded is reported right away and skipped; the
// others are still checked.
async fn validate_links(files: &[std::path::PathBuf], opts: &CheckOptions, json: bool) -> Result<i32> {
    let mut sources = Vec::new();
    let mut load_failures = 0;

    for path in files {
        if !json {
            println!("🔍 Loading {}...", path.display());
        }
        let document = match dataset::load_json(path) {
            Ok(document) => document,
            Err(e) => {
                eprintln!("❌ {}", e);
                load_failures += 1;
                continue;
            }
        };

        let links = checker::extract_links(&document, opts.policy);
        if !json {
            println!("   Found {} links to check.", links.len());
        }
        sources.push(SourceLinks {
            source: source_name(path),
            links,
        });
    }

    if sources.is_empty() {
        eprintln!("🛑 Aborting: no input file could be loaded.");
        return Ok(EXIT_ERROR);
    }

    let client = checker::build_client(opts)?;
    let records = checker::validate_sources(&client, sources, opts.pool_size()).await;
    let report = ValidationReport::from_records(records);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        print!("{}", report.render()?);
    }

    Ok(if load_failures > 0 {
        EXIT_ERROR
    } else if report.broken() > 0 {
        EXIT_PROBLEMS
    } else {
        EXIT_CLEAN
    })
}

fn source_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// Handles the 'data' subcommand
fn handle_data(args: &DataArgs) -> Result<i32> {
    validate_data(&args.data_paths(), args.json)
}

fn validate_data(paths: &DataPaths, json: bool) -> Result<i32> {
    if !json {
        println!("🔍 Starting Data Validation...\n");
    }

    let (data, load_errors) = dataset::load_dataset(paths);
    for e in &load_errors {
        eprintln!("❌ {}", e);
    }

    let report = dataset::validate(&data);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render()?);
    }

    Ok(if !load_errors.is_empty() {
        EXIT_ERROR
    } else if !report.is_consistent() {
        EXIT_PROBLEMS
    } else {
        EXIT_CLEAN
    })
}
