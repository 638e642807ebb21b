//! Error types for configuration resolution.
//!
//! Responsibilities:
//! - Define error variants for document parsing, location parsing, fetching,
//!   cache persistence and resolution.
//! - Carry enough context (paths, URLs, line numbers) to debug a failure
//!   from its message alone.
//!
//! Does NOT handle:
//! - Deciding which failures are fatal (see `resolver.rs`).
//! - Logging (callers log recovered errors with `tracing`).
//!
//! Invariants:
//! - Only [`ResolverError::FallbackUnreadable`] can abort resolver construction.
//! - [`FetchError`] is treated uniformly by the resolver; its variants exist
//!   for diagnostics only.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors produced while parsing or editing a [`crate::Document`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Malformed line {line}: expected `key=value`, found {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("Invalid key {0:?}: keys must be non-empty and must not contain '=', ':' or line breaks")]
    InvalidKey(String),

    #[error("Invalid value for key {key:?}: values must not contain line breaks")]
    InvalidValue { key: String },
}

/// Errors produced while parsing a [`crate::Location`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location must not be empty")]
    Empty,

    #[error("Invalid URL {input:?}: {message}")]
    InvalidUrl { input: String, message: String },

    #[error("Unsupported location scheme '{scheme}' (expected http, https or file)")]
    UnsupportedScheme { scheme: String },
}

/// Errors produced while fetching a document from a [`crate::Location`].
///
/// The resolver reports every variant as a network failure; the split only
/// helps whoever reads the logs.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Transport error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Malformed document at {location}: {source}")]
    Malformed {
        location: String,
        #[source]
        source: DocumentError,
    },

    #[error("Fetcher cannot handle location {0}")]
    UnsupportedLocation(String),
}

/// Errors produced by [`crate::CacheFile`].
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("No cache file at {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to read cache file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse cache file at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("Failed to persist cache file at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    /// Returns true if the cache file simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors surfaced by [`crate::ConfigResolver`].
#[derive(Error, Debug)]
pub enum ResolverError {
    /// The bundled fallback could not be read or parsed. There is nothing
    /// left to fall back to, so construction fails.
    #[error("Fallback config at {location} is unreadable: {source}")]
    FallbackUnreadable {
        location: String,
        #[source]
        source: FetchError,
    },

    /// `get` was called with a key present in neither document.
    #[error("Config key '{0}' not found")]
    KeyNotFound(String),
}

impl ResolverError {
    /// Returns true if this error is a missing key rather than a load failure.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }
}
