//! Common test utilities for integration tests.
//!
//! Shared helpers for serving config documents from a wiremock server and
//! writing fallback files. Integration tests pull these in with
//! `mod common; use common::*;`.
//!
//! # What this does NOT handle
//! - Test-specific assertions or test logic

use std::path::PathBuf;
use std::time::Duration;

#[allow(unused_imports)]
pub use confstack_client::{
    ActiveSource, ConfigResolver, FetchError, HttpFetcher, Location, RefreshStatus,
    ResolverOptions,
};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

use tempfile::TempDir;
use wiremock::matchers::{method, path};

/// Path the mock server serves the remote config from.
pub const REMOTE_PATH: &str = "/config/app.properties";

/// Mounts a GET handler returning `body` as plain text, optionally delayed.
#[allow(dead_code)]
pub async fn serve_config(server: &MockServer, body: &str, delay: Option<Duration>) {
    let mut response = ResponseTemplate::new(200)
        .insert_header("content-type", "text/plain; charset=utf-8")
        .set_body_string(body);
    if let Some(delay) = delay {
        response = response.set_delay(delay);
    }

    Mock::given(method("GET"))
        .and(path(REMOTE_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mounts a GET handler returning `status` with an empty body.
#[allow(dead_code)]
pub async fn serve_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(REMOTE_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// The remote location served by `server`.
#[allow(dead_code)]
pub fn remote_location(server: &MockServer) -> Location {
    Location::parse(&format!("{}{}", server.uri(), REMOTE_PATH)).unwrap()
}

/// Writes a fallback document into `dir` and returns its location.
#[allow(dead_code)]
pub fn write_fallback(dir: &TempDir, body: &str) -> Location {
    let path: PathBuf = dir.path().join("fallback.properties");
    std::fs::write(&path, body).unwrap();
    Location::File(path)
}

/// A fetcher with a short timeout so failure tests finish quickly.
#[allow(dead_code)]
pub fn fast_fetcher() -> HttpFetcher {
    HttpFetcher::builder()
        .timeout(Duration::from_millis(500))
        .connect_timeout(Duration::from_millis(500))
        .build()
        .unwrap()
}
