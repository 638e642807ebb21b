//! Resolver tests over real HTTP.
//!
//! These tests drive the full load sequence through [`HttpFetcher`]:
//! - Synchronous and asynchronous refresh from a mock server
//! - Forced offline mode
//! - Degradation to cache or fallback when the server fails
//! - Cache round trip between two resolver instances
//!
//! # Invariants
//! - Construction never fails because of the remote; only the fallback is fatal

mod common;

use std::time::Duration;

use common::*;
use confstack_client::ResolverError;
use tempfile::TempDir;

#[tokio::test]
async fn test_sync_remote_wins_over_fallback() {
    let server = MockServer::start().await;
    serve_config(&server, "configSource=remote\n", None).await;
    let dir = TempDir::new().unwrap();

    let options = ResolverOptions::new(
        "http-tests",
        remote_location(&server),
        write_fallback(&dir, "configSource=fallback\n"),
    );
    let config = ConfigResolver::load(options, fast_fetcher()).await.unwrap();

    assert_eq!(config.get("configSource").unwrap(), "remote");
    assert_eq!(config.active_source(), ActiveSource::Online);
}

#[tokio::test]
async fn test_forced_offline_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200).set_body_string("configSource=remote\n"))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let options = ResolverOptions::new(
        "http-tests",
        remote_location(&server),
        write_fallback(&dir, "configSource=fallback\n"),
    )
    .force_offline_mode(true);
    let config = ConfigResolver::load(options, fast_fetcher()).await.unwrap();

    assert_eq!(config.get("configSource").unwrap(), "fallback");
    assert_eq!(config.active_source(), ActiveSource::Offline);
}

#[tokio::test]
async fn test_merged_remote_and_fallback() {
    let server = MockServer::start().await;
    serve_config(&server, "configSource=mergedRemote\nremoteParam=yes\n", None).await;
    let dir = TempDir::new().unwrap();

    let options = ResolverOptions::new(
        "http-tests",
        remote_location(&server),
        write_fallback(&dir, "configSource=mergedLocal\nlocalParam=yes\n"),
    );
    let config = ConfigResolver::load(options, fast_fetcher()).await.unwrap();

    assert_eq!(config.get("configSource").unwrap(), "mergedRemote");
    assert_eq!(config.get("remoteParam").unwrap(), "yes");
    assert_eq!(config.get("localParam").unwrap(), "yes");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_returns_before_slow_remote_completes() {
    let server = MockServer::start().await;
    serve_config(
        &server,
        "configSource=remote\n",
        Some(Duration::from_millis(300)),
    )
    .await;
    let dir = TempDir::new().unwrap();

    let options = ResolverOptions::new(
        "http-tests",
        remote_location(&server),
        write_fallback(&dir, "configSource=fallback\n"),
    )
    .asynchronous(true);
    let config = ConfigResolver::load(options, fast_fetcher()).await.unwrap();

    assert_eq!(config.active_source(), ActiveSource::Offline);
    assert_eq!(config.get("configSource").unwrap(), "fallback");

    let status = tokio::time::timeout(Duration::from_secs(10), config.wait_for_refresh())
        .await
        .expect("refresh should settle");
    assert_eq!(status, RefreshStatus::Succeeded);
    assert_eq!(config.active_source(), ActiveSource::Online);
    assert_eq!(config.get("configSource").unwrap(), "remote");
}

#[tokio::test]
async fn test_server_error_degrades_to_fallback() {
    let server = MockServer::start().await;
    serve_status(&server, 500).await;
    let dir = TempDir::new().unwrap();

    let options = ResolverOptions::new(
        "http-tests",
        remote_location(&server),
        write_fallback(&dir, "configSource=fallback\n"),
    );
    let config = ConfigResolver::load(options, fast_fetcher()).await.unwrap();

    assert_eq!(config.active_source(), ActiveSource::Offline);
    assert_eq!(config.refresh_status(), RefreshStatus::Failed);
    assert_eq!(config.get("configSource").unwrap(), "fallback");
}

#[tokio::test]
async fn test_cache_survives_remote_outage() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join("cache").join("app.cache");
    let fallback = write_fallback(&dir, "configSource=fallback\n");

    let healthy = MockServer::start().await;
    serve_config(&healthy, "configSource=remote\nremoteParam=yes\n", None).await;
    let first = ConfigResolver::load(
        ResolverOptions::new("http-tests", remote_location(&healthy), fallback.clone())
            .cache_file(&cache),
        fast_fetcher(),
    )
    .await
    .unwrap();
    assert_eq!(first.active_source(), ActiveSource::Online);

    let broken = MockServer::start().await;
    serve_status(&broken, 503).await;
    let second = ConfigResolver::load(
        ResolverOptions::new("http-tests", remote_location(&broken), fallback)
            .cache_file(&cache),
        fast_fetcher(),
    )
    .await
    .unwrap();

    assert_eq!(second.active_source(), ActiveSource::Cache);
    for (key, value) in first.remote_document().iter() {
        assert_eq!(second.get(key).unwrap(), value);
    }
}

#[tokio::test]
async fn test_missing_fallback_fails_even_with_healthy_remote() {
    let server = MockServer::start().await;
    serve_config(&server, "configSource=remote\n", None).await;
    let dir = TempDir::new().unwrap();

    let options = ResolverOptions::new(
        "http-tests",
        remote_location(&server),
        Location::File(dir.path().join("missing.properties")),
    );
    let err = ConfigResolver::load(options, fast_fetcher())
        .await
        .unwrap_err();

    assert!(matches!(err, ResolverError::FallbackUnreadable { .. }));
}

#[tokio::test]
async fn test_load_convenience_uses_http() {
    let server = MockServer::start().await;
    serve_config(&server, "configSource=remote\n", None).await;
    let dir = TempDir::new().unwrap();

    let options = ResolverOptions::new(
        "http-tests",
        remote_location(&server),
        write_fallback(&dir, "configSource=fallback\n"),
    );
    let config = confstack_client::load(options).await.unwrap();

    assert_eq!(config.get("configSource").unwrap(), "remote");
}
