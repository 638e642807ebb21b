//! HTTP(S) document fetcher.
//!
//! This module is responsible for:
//! - Providing a fluent builder for the underlying `reqwest` client
//!   (timeouts, redirects, user agent)
//! - Fetching remote `key=value` documents with a single GET
//! - Mapping transport failures onto [`FetchError`]
//!
//! # What this module does NOT handle:
//! - Retries or backoff (one attempt per fetch, by contract)
//! - Deciding what a failure means for the active source (see the resolver)
//!
//! # Invariants
//! - Non-2xx responses are errors; the body is never parsed for them
//! - `file` locations are delegated to [`FileFetcher`]

use std::time::{Duration, Instant};

use confstack_config::constants::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_REDIRECTS,
    DEFAULT_USER_AGENT,
};
use confstack_config::{Document, DocumentFetcher, FetchError, FileFetcher, Location};
use reqwest::Url;
use tracing::debug;

use crate::error::Result;
use crate::metrics;

/// Fetches documents over HTTP(S), and from disk for `file` locations.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
    timeout: Duration,
    files: FileFetcher,
}

impl HttpFetcher {
    /// Creates a fetcher with default settings.
    pub fn new() -> Result<Self> {
        HttpFetcherBuilder::new().build()
    }

    /// Create a new builder.
    pub fn builder() -> HttpFetcherBuilder {
        HttpFetcherBuilder::new()
    }

    async fn fetch_http(&self, url: &Url) -> std::result::Result<Document, FetchError> {
        debug!(url = %url, "Sending remote config request");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(url, e))?;

        Document::parse(&body).map_err(|e| FetchError::Malformed {
            location: url.to_string(),
            source: e,
        })
    }

    fn classify(&self, url: &Url, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: Box::new(error),
            }
        }
    }
}

impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, location: &Location) -> std::result::Result<Document, FetchError> {
        match location {
            Location::File(_) => self.files.fetch(location).await,
            Location::Http(url) => {
                let started = Instant::now();
                let result = self.fetch_http(url).await;
                metrics::record_fetch(&result, started.elapsed());
                result
            }
        }
    }
}

/// Builder for creating a new [`HttpFetcher`].
///
/// # Example
///
/// ```rust,ignore
/// use confstack_client::HttpFetcher;
///
/// let fetcher = HttpFetcher::builder()
///     .timeout(Duration::from_secs(10))
///     .user_agent("my-app/1.0")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcherBuilder {
    timeout: Duration,
    connect_timeout: Duration,
    max_redirects: usize,
    user_agent: String,
}

impl Default for HttpFetcherBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpFetcherBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total request timeout.
    ///
    /// Default is 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the TCP connect timeout.
    ///
    /// Default is 10 seconds.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the maximum number of redirects to follow. `0` disables redirects.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the fetcher.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized (e.g. the
    /// TLS backend fails to load).
    pub fn build(self) -> Result<HttpFetcher> {
        let redirect = if self.max_redirects == 0 {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(self.max_redirects)
        };

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .redirect(redirect)
            .user_agent(self.user_agent)
            .build()?;

        Ok(HttpFetcher {
            http,
            timeout: self.timeout,
            files: FileFetcher::new(),
        })
    }
}
