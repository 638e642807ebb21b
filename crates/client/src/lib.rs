//! HTTP transport for confstack.
//!
//! This crate implements [`DocumentFetcher`] over HTTP(S) with `reqwest`
//! and offers [`load`], which builds a [`ConfigResolver`] using that fetcher.

pub mod error;
mod fetcher;
pub mod logging;
pub mod metrics;

pub use confstack_config::{
    ActiveSource, ConfigResolver, Document, DocumentFetcher, FetchError, Location,
    RefreshStatus, ResolverError, ResolverOptions,
};
pub use error::{ClientError, Result};
pub use fetcher::{HttpFetcher, HttpFetcherBuilder};

/// Errors from [`load`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

/// Builds a resolver that fetches remote documents with a default
/// [`HttpFetcher`].
///
/// # Example
///
/// ```rust,ignore
/// let options = ResolverOptions::new("my-app", remote, fallback).asynchronous(true);
/// let config = confstack_client::load(options).await?;
/// let endpoint = config.get("endpoint")?;
/// ```
pub async fn load(options: ResolverOptions) -> std::result::Result<ConfigResolver, LoadError> {
    let fetcher = HttpFetcher::new()?;
    Ok(ConfigResolver::load(options, fetcher).await?)
}
