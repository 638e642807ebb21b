//! Centralized constants for the confstack workspace.
//!
//! Default values shared by the resolver and the HTTP fetcher live here to
//! avoid magic number duplication across crates.

// =============================================================================
// Remote Fetch Defaults
// =============================================================================

/// Default total request timeout for a remote fetch in seconds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default TCP connect timeout for a remote fetch in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// User agent sent with remote fetches.
pub const DEFAULT_USER_AGENT: &str = concat!("confstack/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Cache Defaults
// =============================================================================

/// Prefix of the comment header written at the top of cache files.
/// The application name is appended.
pub const CACHE_HEADER_PREFIX: &str = "Config of app";

/// Default cache file name used by [`crate::default_cache_path`] callers.
pub const DEFAULT_CACHE_FILE_NAME: &str = "remote-config.cache";

/// Extension inserted before the timestamp when a corrupt cache is set aside.
pub const CORRUPT_BACKUP_EXTENSION: &str = "corrupt";

/// Extension of the temporary file used for atomic cache writes.
pub const TEMP_FILE_EXTENSION: &str = "tmp";
