//! Error types for the confstack client.

use thiserror::Error;

/// Errors that can occur while building an [`crate::HttpFetcher`] or
/// initializing logging.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The log filter directive could not be parsed.
    #[error("Invalid log filter '{filter}': {message}")]
    InvalidLogFilter { filter: String, message: String },

    /// A global tracing subscriber was already installed.
    #[error("Logging already initialized: {0}")]
    LoggingAlreadyInitialized(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
