// src/config.rs
// =============================================================================
// Explicit configuration passed to each entry point.
//
// - DataPaths: where the four dataset files live
// - CheckOptions: how outbound links are checked
//
// Nothing here is global. main.rs builds these from the command line and
// hands them down to the checker and the dataset validator.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::checker::ExtractionPolicy;

pub const WAGES_FILE: &str = "wages.json";
pub const RESOURCES_FILE: &str = "digital_resources.json";
pub const SKILLS_FILE: &str = "v2_0/top10_skills.json.txt";
pub const OCCUPATIONS_FILE: &str = "v2_0/top10_occ.json.txt";

/// Some government sites reject requests without a browser-like agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Locations of the dataset files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    pub wages: PathBuf,
    pub resources: PathBuf,
    pub skills: PathBuf,
    pub occupations: PathBuf,
}

impl DataPaths {
    /// Default file names resolved against `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        DataPaths {
            wages: data_dir.join(WAGES_FILE),
            resources: data_dir.join(RESOURCES_FILE),
            skills: data_dir.join(SKILLS_FILE),
            occupations: data_dir.join(OCCUPATIONS_FILE),
        }
    }
}

/// Settings for a link validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// Maximum number of requests in flight at once
    pub concurrency: usize,
    pub user_agent: String,
    /// Skip TLS certificate and hostname verification.
    ///
    /// Several ministry sites serve broken certificate chains. This is a
    /// compatibility trade-off the caller has to ask for explicitly; it is
    /// never on by default.
    pub accept_invalid_certs: bool,
    /// Route requests through HTTP(S)_PROXY when those are set
    pub honor_proxy_env: bool,
    pub policy: ExtractionPolicy,
}

impl Default for CheckOptions {
    fn default() -> Self {
        CheckOptions {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_invalid_certs: false,
            honor_proxy_env: true,
            policy: ExtractionPolicy::default(),
        }
    }
}

impl CheckOptions {
    /// Worker pool size, never zero so the dispatcher always makes progress.
    pub fn pool_size(&self) -> usize {
        self.concurrency.max(1)
    }
}
