//! Metrics for remote config fetches.
//!
//! # What this module does NOT handle:
//! - Metrics exposition/export (install a recorder such as
//!   `metrics-exporter-prometheus` in the application)
//!
//! # Invariants
//! - Every remote fetch records exactly one counter increment and one
//!   duration sample, labeled by `outcome`
//! - Zero-cost when no metrics recorder is installed

use std::time::Duration;

use confstack_config::{Document, FetchError};

/// Metric name for the remote fetch counter.
pub const METRIC_FETCH_TOTAL: &str = "confstack_remote_fetch_total";

/// Metric name for the remote fetch duration histogram.
pub const METRIC_FETCH_DURATION: &str = "confstack_remote_fetch_duration_seconds";

/// Outcome categories for metrics labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    /// Non-2xx HTTP response.
    Status,
    Timeout,
    /// Connection, DNS or TLS failures.
    Transport,
    /// The body did not parse as a document.
    Malformed,
    Other,
}

impl FetchOutcome {
    /// Returns the string label for this outcome.
    pub const fn as_str(&self) -> &'static str {
        match self {
            FetchOutcome::Success => "success",
            FetchOutcome::Status => "status",
            FetchOutcome::Timeout => "timeout",
            FetchOutcome::Transport => "transport",
            FetchOutcome::Malformed => "malformed",
            FetchOutcome::Other => "other",
        }
    }
}

impl From<&Result<Document, FetchError>> for FetchOutcome {
    fn from(result: &Result<Document, FetchError>) -> Self {
        match result {
            Ok(_) => FetchOutcome::Success,
            Err(FetchError::Status { .. }) => FetchOutcome::Status,
            Err(FetchError::Timeout { .. }) => FetchOutcome::Timeout,
            Err(FetchError::Transport { .. }) => FetchOutcome::Transport,
            Err(FetchError::Malformed { .. }) => FetchOutcome::Malformed,
            Err(_) => FetchOutcome::Other,
        }
    }
}

/// Records one remote fetch.
pub fn record_fetch(result: &Result<Document, FetchError>, elapsed: Duration) {
    let outcome = FetchOutcome::from(result).as_str();
    metrics::counter!(METRIC_FETCH_TOTAL, "outcome" => outcome).increment(1);
    metrics::histogram!(METRIC_FETCH_DURATION, "outcome" => outcome).record(elapsed.as_secs_f64());
}
