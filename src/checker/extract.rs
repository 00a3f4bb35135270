// src/checker/extract.rs
// =============================================================================
// This module pulls URLs out of an arbitrary JSON document.
//
// The walk is structural: every serde_json::Value is an object, an array or a
// scalar, and we match on that instead of probing types at runtime.
//
// Two policies decide which strings count as links:
// - LinkKeys: only string values stored under a key named "link" or "url"
// - AnyUrl:   any string value anywhere that is an absolute http(s) URL
//
// Every hit is annotated with its structural path, e.g. `resources.digital[2].url`,
// so a human can find and fix it in the source file.
// =============================================================================

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Which string values are treated as links.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionPolicy {
    /// Only values under keys literally named `link` or `url`
    #[default]
    LinkKeys,
    /// Any string value that is an absolute http(s) URL
    AnyUrl,
}

/// A link found in a document, before it has been checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedLink {
    /// Structural location inside the source document
    pub path: String,
    /// The raw value exactly as it appears in the document
    pub url: String,
}

const LINK_KEYS: [&str; 2] = ["link", "url"];

// Extracts every link from a document according to `policy`
//
// Object keys are visited in file order (serde_json preserve_order), so the
// same input always yields the same list in the same order.
pub fn extract_links(document: &Value, policy: ExtractionPolicy) -> Vec<ExtractedLink> {
    let mut links = Vec::new();
    walk(document, String::new(), policy, &mut links);
    links
}

fn walk(value: &Value, path: String, policy: ExtractionPolicy, links: &mut Vec<ExtractedLink>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };

                match (policy, child) {
                    (ExtractionPolicy::LinkKeys, Value::String(s)) if LINK_KEYS.contains(&key.as_str()) => {
                        links.push(ExtractedLink {
                            path: child_path,
                            url: s.clone(),
                        });
                    }
                    _ => walk(child, child_path, policy, links),
                }
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                walk(item, format!("{}[{}]", path, i), policy, links);
            }
        }
        Value::String(s) => {
            // Under LinkKeys, strings are only collected by their parent object
            if policy == ExtractionPolicy::AnyUrl && looks_like_url(s) {
                links.push(ExtractedLink {
                    path,
                    url: s.clone(),
                });
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// True for absolute http/https URLs with a host.
pub fn looks_like_url(s: &str) -> bool {
    let trimmed = s.trim();
    let lower = trimmed.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    match Url::parse(trimmed) {
        Ok(url) => url.host_str().is_some(),
        Err(_) => false,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is serde_json::Value?
//    - An enum with one variant per JSON type: Null, Bool, Number, String,
//      Array, Object
//    - Matching on it covers every possible document shape, and the compiler
//      checks we didn't forget one
//
// 2. Why pass `path` by value?
//    - Each child gets its own extended copy ("a" -> "a.url", "b" -> "b[0]")
//    - The parent's path is never modified, so siblings don't see each other
// -----------------------------------------------------------------------------
