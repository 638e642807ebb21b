//! Layered configuration resolution for confstack.
//!
//! This crate merges a remote `key=value` document over a local one (either a
//! cached copy of the last successful remote fetch or a bundled fallback) and
//! tracks which source currently backs the merged view.
//!
//! The crate is network-free: remote retrieval goes through the
//! [`DocumentFetcher`] trait, implemented over HTTP by `confstack-client`.

pub mod cache;
pub mod constants;
pub mod document;
pub mod error;
pub mod fetch;
pub mod location;
pub mod resolver;
pub mod source;

pub use cache::{CacheFile, default_cache_path};
pub use document::Document;
pub use error::{CacheError, DocumentError, FetchError, LocationError, ResolverError};
pub use fetch::{DocumentFetcher, FileFetcher};
pub use location::Location;
pub use resolver::{ConfigResolver, ResolverOptions};
pub use source::{ActiveSource, LocalDocument, RefreshStatus};
