//! Cache persistence for the last successful remote document.
//!
//! Responsibilities:
//! - Read a previously cached document from disk.
//! - Write a document to disk atomically, creating parent directories.
//! - Set aside corrupt cache files so they do not block startup.
//! - Compute a platform-standard cache location.
//!
//! Does NOT handle:
//! - Deciding when to read or write the cache (see `resolver.rs`).
//!
//! Invariants:
//! - A write either leaves the previous cache untouched or replaces it
//!   completely (temp file + rename).
//! - The cache is advisory: callers treat write failures as non-fatal.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::constants::{CACHE_HEADER_PREFIX, CORRUPT_BACKUP_EXTENSION, TEMP_FILE_EXTENSION};
use crate::document::Document;
use crate::error::CacheError;

/// A cache file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFile {
    path: PathBuf,
}

impl CacheFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the cached document.
    ///
    /// # Errors
    /// [`CacheError::NotFound`] if no cache has been written yet,
    /// [`CacheError::Read`] for other I/O failures and
    /// [`CacheError::Malformed`] if the file does not parse.
    pub async fn read(&self) -> Result<Document, CacheError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => CacheError::NotFound {
                    path: self.path.clone(),
                },
                _ => CacheError::Read {
                    path: self.path.clone(),
                    source: e,
                },
            })?;

        Document::parse(&content).map_err(|e| CacheError::Malformed {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Writes `document` to the cache, optionally preceded by a comment header.
    ///
    /// Writes to `<name>.tmp` next to the target first, then renames it over
    /// the target so the cache is never left partially written.
    pub async fn write(
        &self,
        document: &Document,
        header: Option<&str>,
    ) -> Result<(), CacheError> {
        let persist_err = |source| CacheError::Persist {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(persist_err)?;
        }

        let temp_path = self.sibling(TEMP_FILE_EXTENSION);
        tokio::fs::write(&temp_path, document.render(header))
            .await
            .map_err(persist_err)?;

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(persist_err(e));
        }

        tracing::debug!(
            path = %self.path.display(),
            entries = document.len(),
            "Cache saved atomically"
        );

        Ok(())
    }

    /// Moves a corrupt cache file aside so the next run starts clean.
    ///
    /// The file is renamed to `<name>.corrupt.<unix-timestamp>`. Returns the
    /// backup path.
    pub async fn set_aside_corrupt(&self) -> Result<PathBuf, std::io::Error> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let backup_path = self.sibling(&format!("{CORRUPT_BACKUP_EXTENSION}.{timestamp}"));
        tokio::fs::rename(&self.path, &backup_path).await?;

        Ok(backup_path)
    }

    /// `<path>.<suffix>`, keeping the original extension.
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".");
        name.push(suffix);
        PathBuf::from(name)
    }
}

/// The comment header written at the top of cache files for `app_name`.
pub fn cache_header(app_name: &str) -> String {
    format!("{CACHE_HEADER_PREFIX} {app_name}")
}

/// Returns the platform-standard cache location for `app_name`:
/// - Linux: `~/.local/share/<app>/<file_name>`
/// - macOS: `~/Library/Application Support/<app>/<file_name>`
/// - Windows: `%AppData%\<app>\data\<file_name>`
///
/// Returns `None` if no home directory can be determined.
pub fn default_cache_path(app_name: &str, file_name: &str) -> Option<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("", "", app_name)?;
    Some(proj_dirs.data_dir().join(file_name))
}
