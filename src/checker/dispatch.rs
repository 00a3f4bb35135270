// src/checker/dispatch.rs
// =============================================================================
// This module runs the link checker over a whole set of URLs.
//
// How it works:
// 1. Deduplicate the URLs (the same link often appears in many places)
// 2. Check them through a bounded pool: at most `pool_size` requests in flight
// 3. Collect outcomes as they complete (completion order is arbitrary)
// 4. Hand every extracted record the outcome of its URL, in extraction order
//
// A failed check never stops the others. Each request is bounded by the
// client timeout, so the whole run always finishes.
// =============================================================================

use futures::stream::{self, StreamExt}; // StreamExt gives us .buffer_unordered()
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::extract::ExtractedLink;
use super::http::{check_url, CheckOutcome, LinkDetail, LinkStatus};

/// A checked link, ready for the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// File the link came from
    pub source: String,
    /// Structural location inside that file
    pub path: String,
    pub url: String,
    pub status: LinkStatus,
    pub detail: LinkDetail,
}

/// Links extracted from one source file
#[derive(Debug, Clone)]
pub struct SourceLinks {
    pub source: String,
    pub links: Vec<ExtractedLink>,
}

// Checks every URL through a pool of `pool_size` concurrent requests
//
// Returns (url, outcome) pairs in completion order. Callers that need a
// stable order have to re-sort.
pub async fn check_links(
    client: &Client,
    urls: Vec<String>,
    pool_size: usize,
) -> Vec<(String, CheckOutcome)> {
    let futures = urls.into_iter().map(|url| async move {
        let outcome = check_url(client, &url).await;
        (url, outcome)
    });

    // buffer_unordered(n) keeps at most n futures running and yields each
    // result as soon as it's ready
    stream::iter(futures)
        .buffer_unordered(pool_size.max(1))
        .collect()
        .await
}

// Checks all links from all sources and returns one record per extracted link
//
// Each distinct raw URL is fetched once, however many times it appears.
pub async fn validate_sources(
    client: &Client,
    sources: Vec<SourceLinks>,
    pool_size: usize,
) -> Vec<LinkRecord> {
    let unique = unique_urls(&sources);
    tracing::info!(
        unique = unique.len(),
        pool_size,
        "dispatching link checks"
    );

    let outcomes: HashMap<String, CheckOutcome> =
        check_links(client, unique, pool_size).await.into_iter().collect();

    let mut records = Vec::new();
    for source in sources {
        for link in source.links {
            // Every unique URL was dispatched, so the lookup can't miss
            let outcome = outcomes.get(&link.url).cloned().unwrap_or_else(|| CheckOutcome {
                status: LinkStatus::Fail,
                detail: LinkDetail::Message("Not checked".to_string()),
            });
            records.push(LinkRecord {
                source: source.source.clone(),
                path: link.path,
                url: link.url,
                status: outcome.status,
                detail: outcome.detail,
            });
        }
    }
    records
}

// Distinct raw URLs, first occurrence first
fn unique_urls(sources: &[SourceLinks]) -> Vec<String> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .flat_map(|s| s.links.iter())
        .filter(|link| seen.insert(link.url.as_str()))
        .map(|link| link.url.clone())
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why buffer_unordered and not tokio::spawn per URL?
//    - Spawning everything at once would open every connection at once
//    - buffer_unordered(n) only polls n futures at a time, the rest wait
//    - That is our worker pool: no threads to manage, no semaphore needed
//
// 2. Why does the result come back in a different order?
//    - A fast server answers before a slow one that was asked first
//    - We don't fight that; validate_sources looks results up by URL
//
// 3. Why a HashMap from URL to outcome?
//    - The same link shows up in many places in the dataset
//    - We check it once and copy the outcome into every record
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::http::build_client;
    use crate::checker::test_server::TestServer;
    use crate::config::CheckOptions;
    use std::time::Duration;

    fn client() -> Client {
        build_client(&CheckOptions {
            timeout: Duration::from_secs(5),
            honor_proxy_env: false,
            ..CheckOptions::default()
        })
        .unwrap()
    }

    fn link(path: &str, url: &str) -> ExtractedLink {
        ExtractedLink {
            path: path.to_string(),
            url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_pool_bounds_concurrency() {
        let server = TestServer::spawn().await;
        let urls: Vec<String> = (0..25).map(|i| server.url(&format!("/slow/50?i={}", i))).collect();

        let results = check_links(&client(), urls, 10).await;

        assert_eq!(results.len(), 25);
        assert_eq!(server.hits(), 25);
        assert!(server.max_in_flight() <= 10, "max in flight: {}", server.max_in_flight());
        assert!(server.max_in_flight() >= 2, "checks did not overlap");
        assert!(results.iter().all(|(_, o)| o.status == LinkStatus::Ok));
    }

    #[tokio::test]
    async fn test_zero_pool_size_still_completes() {
        let server = TestServer::spawn().await;
        let urls = vec![server.url("/status/200"), server.url("/status/404")];

        let results = check_links(&client(), urls, 0).await;

        assert_eq!(results.len(), 2);
        assert_eq!(server.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_duplicates_checked_once_and_fanned_out() {
        let server = TestServer::spawn().await;
        let ok = server.url("/status/200");
        let missing = server.url("/status/404");

        let sources = vec![
            SourceLinks {
                source: "a.json".to_string(),
                links: vec![link("x.url", &ok), link("y.link", "N/A"), link("z.url", &missing)],
            },
            SourceLinks {
                source: "b.json".to_string(),
                links: vec![link("[0].url", &ok)],
            },
        ];

        let records = validate_sources(&client(), sources, 4).await;

        assert_eq!(server.hits(), 2);
        let summary: Vec<(&str, &str, LinkStatus)> = records
            .iter()
            .map(|r| (r.source.as_str(), r.path.as_str(), r.status))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a.json", "x.url", LinkStatus::Ok),
                ("a.json", "y.link", LinkStatus::Skip),
                ("a.json", "z.url", LinkStatus::Warn),
                ("b.json", "[0].url", LinkStatus::Ok),
            ]
        );
        assert_eq!(records[2].detail, LinkDetail::Code(404));
    }

    #[test]
    fn test_unique_urls_keeps_first_occurrence_order() {
        let sources = vec![SourceLinks {
            source: "s".to_string(),
            links: vec![link("a", "u2"), link("b", "u1"), link("c", "u2")],
        }];
        assert_eq!(unique_urls(&sources), vec!["u2", "u1"]);
    }
}
