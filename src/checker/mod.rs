// src/checker/mod.rs
// =============================================================================
// This module contains all link validation logic.
//
// Submodules:
// - extract: Finds URLs inside JSON documents, with their structural paths
// - http: Checks one URL and classifies the outcome
// - dispatch: Runs the checks through a bounded concurrent pool
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod dispatch;
mod extract;
mod http;

#[cfg(test)]
mod test_server;

pub use dispatch::{validate_sources, LinkRecord, SourceLinks};
pub use extract::{extract_links, ExtractionPolicy};
pub use http::{build_client, LinkDetail, LinkStatus};
