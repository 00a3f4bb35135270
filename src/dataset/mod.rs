// src/dataset/mod.rs
// =============================================================================
// This module handles the labor-market dataset files.
//
// Submodules:
// - loader: Reads and parses one JSON file with typed errors
// - integrity: Cross-file consistency checks (wages vs occupations, etc.)
// =============================================================================

mod integrity;
mod loader;

pub use integrity::{validate, Dataset};
pub use loader::{load_json, LoadError};

use crate::config::DataPaths;

// Loads every dataset file named in `paths`
//
// A file that fails to load is left as None in the Dataset and its error is
// returned alongside, so the remaining files can still be validated.
pub fn load_dataset(paths: &DataPaths) -> (Dataset, Vec<LoadError>) {
    let mut errors = Vec::new();
    let mut load = |path: &std::path::Path| match load_json(path) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let dataset = Dataset {
        wages: load(&paths.wages),
        resources: load(&paths.resources),
        skills: load(&paths.skills),
        occupations: load(&paths.occupations),
    };
    (dataset, errors)
}
