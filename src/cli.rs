// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - links: check every outbound link in one or more JSON files
// - data:  check that the dataset files agree with each other
//
// The parsed arguments are turned into the explicit configuration structs in
// config.rs before anything runs.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::checker::ExtractionPolicy;
use crate::config::{CheckOptions, DataPaths, DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(
    name = "compass-guardian",
    version,
    about = "Validate links and referential integrity in labor-market JSON datasets",
    long_about = "compass-guardian checks the outbound links in the dataset's JSON files and \
                  verifies that wages, occupations and resources reference each other consistently."
)]
pub struct Cli {
    /// Increase diagnostic output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check outbound links in JSON files
    ///
    /// Example: compass-guardian links digital_resources.json --concurrency 20
    Links(LinksArgs),

    /// Check referential integrity across wages, resources, skills and occupations
    ///
    /// Example: compass-guardian data --data-dir ./prototype
    Data(DataArgs),
}

#[derive(Args, Debug)]
pub struct LinksArgs {
    /// JSON files to scan (default: digital_resources.json in --data-dir)
    pub files: Vec<PathBuf>,

    /// Directory holding the dataset files
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Which string values count as links
    #[arg(long, value_enum, default_value_t = ExtractionPolicy::LinkKeys)]
    pub policy: ExtractionPolicy,

    /// Maximum number of requests in flight
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Accept invalid TLS certificates and hostnames
    ///
    /// Some government sites serve misconfigured certificates. Only use this
    /// for reachability checks; it disables certificate verification.
    #[arg(long)]
    pub insecure: bool,

    /// Ignore HTTP_PROXY / HTTPS_PROXY from the environment
    #[arg(long)]
    pub no_proxy: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

impl LinksArgs {
    pub fn check_options(&self) -> CheckOptions {
        CheckOptions {
            timeout: Duration::from_secs(self.timeout),
            concurrency: self.concurrency,
            accept_invalid_certs: self.insecure,
            honor_proxy_env: !self.no_proxy,
            policy: self.policy,
            ..CheckOptions::default()
        }
    }

    /// Files to scan; the resources file when none were given
    pub fn input_files(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            vec![DataPaths::in_dir(&self.data_dir).resources]
        } else {
            self.files.clone()
        }
    }
}

#[derive(Args, Debug)]
pub struct DataArgs {
    /// Directory holding the dataset files
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Override the wages file
    #[arg(long)]
    pub wages: Option<PathBuf>,

    /// Override the digital resources file
    #[arg(long)]
    pub resources: Option<PathBuf>,

    /// Override the skills file
    #[arg(long)]
    pub skills: Option<PathBuf>,

    /// Override the occupations file
    #[arg(long)]
    pub occupations: Option<PathBuf>,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl DataArgs {
    pub fn data_paths(&self) -> DataPaths {
        let defaults = DataPaths::in_dir(&self.data_dir);
        DataPaths {
            wages: self.wages.clone().unwrap_or(defaults.wages),
            resources: self.resources.clone().unwrap_or(defaults.resources),
            skills: self.skills.clone().unwrap_or(defaults.skills),
            occupations: self.occupations.clone().unwrap_or(defaults.occupations),
        }
    }
}
