//! The document fetching seam.
//!
//! Responsibilities:
//! - Define [`DocumentFetcher`], the one operation the resolver needs from a
//!   transport: turn a [`Location`] into a parsed [`Document`].
//! - Provide [`FileFetcher`] for filesystem locations.
//!
//! Does NOT handle:
//! - HTTP (implemented by `confstack-client`).
//! - Retries or backoff; a fetch is a single attempt.

use std::future::Future;

use crate::document::Document;
use crate::error::FetchError;
use crate::location::Location;

/// Retrieves and parses a document from a location.
///
/// Implementations make exactly one attempt per call.
pub trait DocumentFetcher: Send + Sync {
    fn fetch(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<Document, FetchError>> + Send;
}

/// Reads documents from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentFetcher for FileFetcher {
    async fn fetch(&self, location: &Location) -> Result<Document, FetchError> {
        let Location::File(path) = location else {
            return Err(FetchError::UnsupportedLocation(location.to_string()));
        };

        tracing::debug!(path = %path.display(), "Reading config from local file");

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FetchError::Io {
                location: location.to_string(),
                source: e,
            })?;

        Document::parse(&content).map_err(|e| FetchError::Malformed {
            location: location.to_string(),
            source: e,
        })
    }
}

impl<T: DocumentFetcher> DocumentFetcher for std::sync::Arc<T> {
    fn fetch(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<Document, FetchError>> + Send {
        (**self).fetch(location)
    }
}
