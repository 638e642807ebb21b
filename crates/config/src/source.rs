//! Source tags for the merged configuration view.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::Document;

/// Which origin currently backs the merged view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveSource {
    /// A remote fetch succeeded during this instance's lifetime.
    Online,
    /// The local document came from the cache of an earlier remote fetch.
    Cache,
    /// The local document came from the bundled fallback.
    Offline,
}

impl ActiveSource {
    /// Returns the string label for this source.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ActiveSource::Online => "online",
            ActiveSource::Cache => "cache",
            ActiveSource::Offline => "offline",
        }
    }
}

impl fmt::Display for ActiveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of the local-load step: the cache and the fallback are
/// alternatives for the same slot, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalDocument {
    Cache(Document),
    Fallback(Document),
}

impl LocalDocument {
    /// The active source implied by this local document alone.
    pub fn source(&self) -> ActiveSource {
        match self {
            LocalDocument::Cache(_) => ActiveSource::Cache,
            LocalDocument::Fallback(_) => ActiveSource::Offline,
        }
    }

    pub fn document(&self) -> &Document {
        match self {
            LocalDocument::Cache(doc) | LocalDocument::Fallback(doc) => doc,
        }
    }
}

/// Progress of the single remote refresh an instance performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshStatus {
    /// No refresh will run (offline mode or local-only resolver).
    Skipped,
    /// A background refresh is in flight.
    Pending,
    Succeeded,
    Failed,
}

impl RefreshStatus {
    /// Returns true once no further state change will happen.
    pub const fn is_settled(&self) -> bool {
        !matches!(self, RefreshStatus::Pending)
    }
}
