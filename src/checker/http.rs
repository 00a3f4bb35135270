// src/checker/http.rs
// =============================================================================
// This module checks whether a single URL is reachable.
//
// Key functionality:
// - Skips placeholder values ("", "#", "N/A", "TBD") without touching the network
// - Normalizes the URL (trim, add https:// when the scheme is missing)
// - Makes one GET request with a fixed timeout and a browser user agent
// - Classifies the outcome as OK / WARN / FAIL
//
// A failed request is never retried. Every URL gets exactly one attempt
// per run.
// =============================================================================

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::CheckOptions;

/// Values that mean "intentionally no link here".
pub const PLACEHOLDERS: [&str; 4] = ["", "#", "N/A", "TBD"];

const MAX_REDIRECTS: usize = 10;

// Represents the status of a link after checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LinkStatus {
    /// Responded with a status in [200, 400)
    Ok,
    /// Responded, but with a status outside [200, 400)
    Warn,
    /// No HTTP response at all (timeout, DNS, refused, TLS, ...)
    Fail,
    /// Placeholder value, not checked
    Skip,
}

impl LinkStatus {
    pub fn tag(self) -> &'static str {
        match self {
            LinkStatus::Ok => "OK",
            LinkStatus::Warn => "WARN",
            LinkStatus::Fail => "FAIL",
            LinkStatus::Skip => "SKIP",
        }
    }

    pub fn is_broken(self) -> bool {
        matches!(self, LinkStatus::Warn | LinkStatus::Fail)
    }
}

/// What the checker has to say about a link: an HTTP code or a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkDetail {
    Code(u16),
    Message(String),
}

impl fmt::Display for LinkDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkDetail::Code(code) => write!(f, "{}", code),
            LinkDetail::Message(msg) => f.write_str(msg),
        }
    }
}

/// Result of checking one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub status: LinkStatus,
    pub detail: LinkDetail,
}

impl CheckOutcome {
    fn skip() -> Self {
        CheckOutcome {
            status: LinkStatus::Skip,
            detail: LinkDetail::Message("Placeholder".to_string()),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        CheckOutcome {
            status: LinkStatus::Fail,
            detail: LinkDetail::Message(message.into()),
        }
    }
}

// Builds the HTTP client shared by every check in a run
//
// The client is cheap to clone (it's reference counted internally) and pools
// connections, so we build it once and hand out clones.
pub fn build_client(opts: &CheckOptions) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(opts.timeout)
        .user_agent(opts.user_agent.clone())
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));

    if opts.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled for this run");
        builder = builder.danger_accept_invalid_certs(true);
    }
    if !opts.honor_proxy_env {
        builder = builder.no_proxy();
    }

    builder.build().context("Failed to create HTTP client")
}

pub fn is_placeholder(raw: &str) -> bool {
    PLACEHOLDERS.contains(&raw.trim())
}

// Trims the value and prefixes https:// when there is no scheme
//
// Example:
//   "  example.org/page " -> "https://example.org/page"
//   "http://example.org"  -> "http://example.org"
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

// True when the value starts with `scheme://`, where the scheme is a letter
// followed by letters, digits, '+', '-' or '.'
//
// A "://" further along (e.g. inside a query string) doesn't count.
fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

// Checks a single link
//
// Placeholders short-circuit to SKIP. Everything else gets one GET request.
pub async fn check_url(client: &Client, raw: &str) -> CheckOutcome {
    if is_placeholder(raw) {
        return CheckOutcome::skip();
    }

    let target = normalize_url(raw);
    tracing::debug!(url = %target, "checking link");

    match client.get(&target).send().await {
        Ok(response) => {
            let code = response.status().as_u16();
            CheckOutcome {
                status: classify_status(code),
                detail: LinkDetail::Code(code),
            }
        }
        Err(e) => {
            tracing::debug!(url = %target, error = %e, "link check failed");
            CheckOutcome::fail(categorize_error(&e))
        }
    }
}

// Maps an HTTP status code to a link status
//
// Anything in [200, 400) is fine. Everything else still answered, so it's a
// warning rather than a hard failure.
pub fn classify_status(code: u16) -> LinkStatus {
    if (200..400).contains(&code) {
        LinkStatus::Ok
    } else {
        LinkStatus::Warn
    }
}

// Turns a transport-level reqwest error into a short description
fn categorize_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Timeout".to_string()
    } else if error.is_redirect() {
        "Too many redirects".to_string()
    } else if error.is_connect() {
        format!("Connection Error: {}", root_cause(error))
    } else if error.is_builder() {
        format!("Invalid URL: {}", root_cause(error))
    } else {
        error.to_string()
    }
}

// reqwest wraps the interesting part (refused, DNS, certificate) a few
// levels down the source chain
fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::test_server::TestServer;
    use std::time::Duration;

    fn test_options() -> CheckOptions {
        CheckOptions {
            timeout: Duration::from_millis(500),
            honor_proxy_env: false,
            ..CheckOptions::default()
        }
    }

    #[test]
    fn test_normalize_adds_scheme() {
        assert_eq!(normalize_url("example.org/page"), "https://example.org/page");
        assert_eq!(normalize_url("  www.example.org \n"), "https://www.example.org");
    }

    #[test]
    fn test_normalize_ignores_scheme_inside_query() {
        assert_eq!(
            normalize_url("example.org/go?next=https://other.org"),
            "https://example.org/go?next=https://other.org"
        );
        assert_eq!(
            normalize_url("example.org/redirect/http://x.org"),
            "https://example.org/redirect/http://x.org"
        );
        assert_eq!(normalize_url("svn+ssh://repo.example.org"), "svn+ssh://repo.example.org");
    }

    #[test]
    fn test_normalize_keeps_existing_scheme() {
        assert_eq!(normalize_url("http://example.org"), "http://example.org");
        assert_eq!(normalize_url(" https://example.org/a?b=c "), "https://example.org/a?b=c");
    }

    #[test]
    fn test_insecure_client_builds() {
        let opts = CheckOptions {
            accept_invalid_certs: true,
            ..test_options()
        };
        assert!(build_client(&opts).is_ok());
    }

    #[tokio::test]
    async fn test_insecure_client_still_checks_links() {
        let server = TestServer::spawn().await;
        let client = build_client(&CheckOptions {
            accept_invalid_certs: true,
            ..test_options()
        })
        .unwrap();

        let outcome = check_url(&client, &server.url("/status/200")).await;
        assert_eq!(outcome.status, LinkStatus::Ok);
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(200), LinkStatus::Ok);
        assert_eq!(classify_status(204), LinkStatus::Ok);
        assert_eq!(classify_status(301), LinkStatus::Ok);
        assert_eq!(classify_status(399), LinkStatus::Ok);
        assert_eq!(classify_status(400), LinkStatus::Warn);
        assert_eq!(classify_status(404), LinkStatus::Warn);
        assert_eq!(classify_status(503), LinkStatus::Warn);
        assert_eq!(classify_status(199), LinkStatus::Warn);
    }

    #[test]
    fn test_status_helpers() {
        assert!(LinkStatus::Warn.is_broken());
        assert!(LinkStatus::Fail.is_broken());
        assert!(!LinkStatus::Ok.is_broken());
        assert!(!LinkStatus::Skip.is_broken());
        assert_eq!(LinkStatus::Skip.tag(), "SKIP");
    }

    #[test]
    fn test_detail_display() {
        assert_eq!(LinkDetail::Code(404).to_string(), "404");
        assert_eq!(LinkDetail::Message("Timeout".into()).to_string(), "Timeout");
    }

    #[tokio::test]
    async fn test_placeholders_skip_without_network() {
        let server = TestServer::spawn().await;
        let client = build_client(&test_options()).unwrap();

        for placeholder in ["", "#", "N/A", "TBD", "  TBD  "] {
            let outcome = check_url(&client, placeholder).await;
            assert_eq!(outcome.status, LinkStatus::Skip, "{:?}", placeholder);
            assert_eq!(outcome.detail, LinkDetail::Message("Placeholder".into()));
        }
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn test_ok_response() {
        let server = TestServer::spawn().await;
        let client = build_client(&test_options()).unwrap();

        let outcome = check_url(&client, &server.url("/status/200")).await;
        assert_eq!(outcome.status, LinkStatus::Ok);
        assert_eq!(outcome.detail, LinkDetail::Code(200));
        assert_eq!(server.hits(), 1);
    }

    #[tokio::test]
    async fn test_not_found_is_warn() {
        let server = TestServer::spawn().await;
        let client = build_client(&test_options()).unwrap();

        let outcome = check_url(&client, &server.url("/status/404")).await;
        assert_eq!(outcome.status, LinkStatus::Warn);
        assert_eq!(outcome.detail, LinkDetail::Code(404));
    }

    #[tokio::test]
    async fn test_timeout_is_fail() {
        let server = TestServer::spawn().await;
        let opts = CheckOptions {
            timeout: Duration::from_millis(200),
            ..test_options()
        };
        let client = build_client(&opts).unwrap();

        let outcome = check_url(&client, &server.url("/hang")).await;
        assert_eq!(outcome.status, LinkStatus::Fail);
        assert_eq!(outcome.detail, LinkDetail::Message("Timeout".into()));
    }

    #[tokio::test]
    async fn test_connection_refused_is_fail() {
        let addr = TestServer::unused_addr().await;
        let client = build_client(&test_options()).unwrap();

        let outcome = check_url(&client, &format!("http://{}/", addr)).await;
        assert_eq!(outcome.status, LinkStatus::Fail);
        match outcome.detail {
            LinkDetail::Message(msg) => assert!(msg.starts_with("Connection Error"), "{}", msg),
            other => panic!("expected message, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sends_browser_user_agent() {
        let server = TestServer::spawn().await;
        let client = build_client(&test_options()).unwrap();

        check_url(&client, &server.url("/status/200")).await;
        let agent = server.last_user_agent().unwrap();
        assert!(agent.starts_with("Mozilla/5.0"), "{}", agent);
    }
}
