//! Logging initialization for applications embedding confstack.
//!
//! The library crates only emit `tracing` events; nothing is printed until
//! the application installs a subscriber, for example with [`init`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use confstack_client::logging::{LogFormat, LoggingConfig};
//!
//! LoggingConfig::new().with_format(LogFormat::Json).init()?;
//! ```

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{ClientError, Result};

/// Output format of the `fmt` layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for the global tracing subscriber.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub default_filter: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the fallback filter directive.
    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Builder method to set the output format.
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Builds the env filter: `RUST_LOG` if set, else the default directive.
    fn filter(&self) -> Result<EnvFilter> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.default_filter).map_err(|e| ClientError::InvalidLogFilter {
            filter: self.default_filter.clone(),
            message: e.to_string(),
        })
    }

    /// Installs the global subscriber.
    ///
    /// # Errors
    /// Fails if the filter directive is invalid or a global subscriber is
    /// already installed.
    pub fn init(&self) -> Result<()> {
        let filter = self.filter()?;
        let registry = tracing_subscriber::registry().with(filter);

        let result = match self.format {
            LogFormat::Text => registry.with(fmt::layer()).try_init(),
            LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        };

        result.map_err(|e| ClientError::LoggingAlreadyInitialized(e.to_string()))
    }
}

/// Installs a text subscriber with the default `info` filter.
pub fn init() -> Result<()> {
    LoggingConfig::new().init()
}
