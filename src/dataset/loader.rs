// src/dataset/loader.rs
// =============================================================================
// Reads a JSON file from disk and parses it into a generic serde_json::Value.
//
// Failures are typed so callers can tell a missing file apart from a broken
// one. Nothing is retried; the caller decides whether to carry on without
// this file.
// =============================================================================

use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a dataset file could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Malformed JSON, with the position serde_json stopped at
    #[error("JSON Error in {} at line {line}, column {column}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::FileNotFound { path }
            | LoadError::Parse { path, .. }
            | LoadError::Io { path, .. } => path,
        }
    }
}

// Loads and parses one JSON document
//
// Parameters:
//   path: file to read (UTF-8)
//
// Returns: the parsed document, or a LoadError describing what went wrong
pub fn load_json(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&content).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })
}
