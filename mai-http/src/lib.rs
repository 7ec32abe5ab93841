//! Minimal blocking HTTP client for fetching schedule pages.
//!
//! - One GET per call, no retries: a failed fetch is terminal for the caller
//! - The response body is read in full and the response dropped before
//!   returning, so the connection is released on every exit path
//! - Optional *raw* response logging via `MAI_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust,no_run
//! # fn demo() -> Result<(), mai_http::HttpError> {
//! let client = mai_http::HttpClient::new()?;
//! let url = url::Url::parse("https://mai.ru/education/schedule/").unwrap();
//! let html = client.get_text(&url)?;
//! assert!(!html.is_empty());
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response status, body snippets (truncated) and final errors.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

pub use url;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "MAI_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status} for {url}, body_snippet: {body_snippet}")]
    Status {
        status: StatusCode,
        url: String,
        body_snippet: String,
    },
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    timeout: Option<Duration>,
}

impl HttpClient {
    /// Client with the transport's default timeout and a crate user agent.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_settings(None, concat!("mai-http/", env!("CARGO_PKG_VERSION")))
    }

    /// Client with an explicit whole-request timeout and user agent.
    ///
    /// ```no_run
    /// use mai_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::with_settings(Some(Duration::from_secs(10)), "mai-schedule/0.1")?;
    /// let url = url::Url::parse("https://mai.ru/education/schedule/").expect("static url");
    /// let _page = client.get_text(&url)?;
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_settings(timeout: Option<Duration>, user_agent: &str) -> Result<Self, HttpError> {
        let mut builder = Client::builder().user_agent(user_agent.to_string());
        if let Some(dur) = timeout {
            builder = builder.timeout(dur);
        }
        let inner = builder.build().map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            timeout,
        })
    }

    /// GET `url` and return the decoded body of a 2xx response.
    pub fn get_text(&self, url: &Url) -> Result<String, HttpError> {
        let req_id = format!(
            "r{:x}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        tracing::debug!(
            req_id=%req_id,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query=?query,
            timeout_ms=?self.timeout.map(|t| t.as_millis() as u64),
            "http.request.start"
        );

        let t0 = Instant::now();
        let resp = self.inner.get(url.clone()).send().map_err(|err| {
            tracing::warn!(req_id=%req_id, message=%err, "http.network_error.send");
            HttpError::Network(err.to_string())
        })?;

        let status = resp.status();
        let body = resp.text().map_err(|err| {
            tracing::warn!(req_id=%req_id, %status, message=%err, "http.network_error.body");
            HttpError::Network(err.to_string())
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=body.len(),
            "http.response"
        );

        if raw_enabled() {
            let (text, truncated) = truncate_at(&body, RAW_MAX_BODY);
            tracing::info!(target: "http.raw", %req_id, %status, body=%text, truncated);
        }

        if status.is_success() {
            return Ok(body);
        }

        let body_snippet = snip_body(&body);
        tracing::warn!(
            req_id=%req_id,
            %status,
            url=%url,
            body_snippet=%body_snippet,
            "http.error"
        );
        Err(HttpError::Status {
            status,
            url: url.to_string(),
            body_snippet,
        })
    }
}

// ==============================
// Helpers
// ==============================

/// Cut `s` to at most `max` bytes on a char boundary.
fn truncate_at(s: &str, max: usize) -> (&str, bool) {
    if s.len() <= max {
        return (s, false);
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    (&s[..end], true)
}

fn snip_body(body: &str) -> String {
    let (head, truncated) = truncate_at(body, SNIPPET_MAX);
    if truncated {
        format!("{head}...")
    } else {
        head.to_string()
    }
}
