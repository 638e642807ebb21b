//! Layered configuration resolver.
//!
//! Responsibilities:
//! - Load the local document (cache if present, else fallback).
//! - Refresh the remote document once, inline or on a background task.
//! - Persist a successful remote fetch to the cache.
//! - Serve merged reads where remote values shadow local ones.
//!
//! Does NOT handle:
//! - Transport details (see [`DocumentFetcher`] implementations).
//! - Periodic re-fetching; each instance refreshes at most once.
//!
//! Invariants:
//! - The local load completes before any remote fetch starts, so readers
//!   always see at least `Cache` or `Offline`.
//! - The remote document and the active source are published together in
//!   one snapshot; `Online` is never observable without remote data.
//! - `Online` is never reached when offline mode is forced.
//! - Only an unreadable fallback fails construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cache::{CacheFile, cache_header};
use crate::document::Document;
use crate::error::{CacheError, FetchError, ResolverError};
use crate::fetch::DocumentFetcher;
use crate::location::Location;
use crate::source::{ActiveSource, LocalDocument, RefreshStatus};

/// Construction parameters for a [`ConfigResolver`].
///
/// # Example
///
/// ```rust,ignore
/// let options = ResolverOptions::new(
///     "my-app",
///     Location::parse("https://config.example.com/my-app.properties")?,
///     Location::parse("config/fallback.properties")?,
/// )
/// .cache_file_opt(default_cache_path("my-app", DEFAULT_CACHE_FILE_NAME))
/// .asynchronous(true);
/// ```
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    app_name: String,
    remote: Location,
    fallback: Location,
    cache_file: Option<PathBuf>,
    asynchronous: bool,
    force_offline_mode: bool,
}

impl ResolverOptions {
    /// Creates options with caching disabled, synchronous refresh and
    /// offline mode off.
    pub fn new(app_name: impl Into<String>, remote: Location, fallback: Location) -> Self {
        Self {
            app_name: app_name.into(),
            remote,
            fallback,
            cache_file: None,
            asynchronous: false,
            force_offline_mode: false,
        }
    }

    /// Enables caching of successful remote fetches at `path`.
    pub fn cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_file = Some(path.into());
        self
    }

    /// Sets or clears the cache location.
    pub fn cache_file_opt(mut self, path: Option<PathBuf>) -> Self {
        self.cache_file = path;
        self
    }

    /// If true, construction returns after the local load and the remote
    /// fetch runs on a background task.
    pub fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.asynchronous = asynchronous;
        self
    }

    /// If true, the remote document is never fetched.
    pub fn force_offline_mode(mut self, offline: bool) -> Self {
        self.force_offline_mode = offline;
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn remote(&self) -> &Location {
        &self.remote
    }

    pub fn fallback(&self) -> &Location {
        &self.fallback
    }
}

/// The mutable part of a resolver, replaced as a whole.
#[derive(Debug, Clone)]
struct Snapshot {
    remote: Arc<Document>,
    source: ActiveSource,
    refresh: RefreshStatus,
}

/// A merged view over a remote document and a local (cache or fallback)
/// document.
///
/// Cloning is cheap and clones observe the same refresh.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    local: Arc<LocalDocument>,
    offline_mode: bool,
    state: Arc<watch::Sender<Snapshot>>,
}

impl ConfigResolver {
    /// Builds a resolver and runs its load sequence.
    ///
    /// In synchronous mode the remote fetch (and cache write) completes
    /// before this returns. In asynchronous mode it runs on a detached
    /// `tokio` task; poll [`Self::active_source`] or await
    /// [`Self::wait_for_refresh`] to observe it.
    ///
    /// # Errors
    /// Returns [`ResolverError::FallbackUnreadable`] if no cache was usable
    /// and the fallback cannot be read or parsed. Remote and cache-write
    /// failures are logged and never returned.
    pub async fn load<F>(options: ResolverOptions, fetcher: F) -> Result<Self, ResolverError>
    where
        F: DocumentFetcher + 'static,
    {
        let ResolverOptions {
            app_name,
            remote,
            fallback,
            cache_file,
            asynchronous,
            force_offline_mode,
        } = options;

        let cache = cache_file.map(CacheFile::new);
        let local = load_local(&fetcher, cache.as_ref(), &fallback).await?;
        let source = local.source();

        info!(app = %app_name, source = %source, "Local config loaded");

        let (state, _) = watch::channel(Snapshot {
            remote: Arc::new(Document::new()),
            source,
            refresh: if force_offline_mode {
                RefreshStatus::Skipped
            } else {
                RefreshStatus::Pending
            },
        });

        let resolver = Self {
            local: Arc::new(local),
            offline_mode: force_offline_mode,
            state: Arc::new(state),
        };

        if force_offline_mode {
            info!(app = %app_name, "Offline mode forced, skipping remote config");
            return Ok(resolver);
        }

        let refresh = RemoteRefresh {
            app_name,
            remote,
            cache,
            state: Arc::clone(&resolver.state),
        };

        if asynchronous {
            debug!("Spawning background remote config refresh");
            tokio::spawn(async move {
                refresh.run(&fetcher).await;
            });
        } else {
            refresh.run(&fetcher).await;
        }

        Ok(resolver)
    }

    /// Builds a local-only resolver from a single `key=value` file.
    ///
    /// The active source is `Offline` and no refresh ever runs. The file is
    /// read with blocking I/O; inside a runtime, call this from
    /// `tokio::task::spawn_blocking`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ResolverError> {
        let path = path.as_ref();
        let location = path.display().to_string();

        info!(path = %location, "Reading config from local file");

        let content =
            std::fs::read_to_string(path).map_err(|e| ResolverError::FallbackUnreadable {
                location: location.clone(),
                source: FetchError::Io {
                    location: location.clone(),
                    source: e,
                },
            })?;
        let document =
            Document::parse(&content).map_err(|e| ResolverError::FallbackUnreadable {
                location: location.clone(),
                source: FetchError::Malformed {
                    location: location.clone(),
                    source: e,
                },
            })?;

        let (state, _) = watch::channel(Snapshot {
            remote: Arc::new(Document::new()),
            source: ActiveSource::Offline,
            refresh: RefreshStatus::Skipped,
        });

        Ok(Self {
            local: Arc::new(LocalDocument::Fallback(document)),
            offline_mode: true,
            state: Arc::new(state),
        })
    }

    /// Returns the value for `key`, preferring the remote document.
    ///
    /// # Errors
    /// [`ResolverError::KeyNotFound`] if neither document has the key.
    pub fn get(&self, key: &str) -> Result<String, ResolverError> {
        let snapshot = self.state.borrow();
        snapshot
            .remote
            .get(key)
            .or_else(|| self.local.document().get(key))
            .map(str::to_owned)
            .ok_or_else(|| ResolverError::KeyNotFound(key.to_string()))
    }

    /// Returns the value for `key`, or `default` if it is defined nowhere.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|_| default.to_string())
    }

    /// Returns true if `key` is present in the remote or the local document.
    pub fn contains(&self, key: &str) -> bool {
        self.state.borrow().remote.contains(key) || self.local.document().contains(key)
    }

    /// Point-in-time read of the active source.
    pub fn active_source(&self) -> ActiveSource {
        self.state.borrow().source
    }

    /// Progress of this instance's remote refresh.
    pub fn refresh_status(&self) -> RefreshStatus {
        self.state.borrow().refresh
    }

    /// Returns true if the remote is never contacted by this instance.
    pub fn is_offline_mode(&self) -> bool {
        self.offline_mode
    }

    /// Waits until the remote refresh has settled and returns its outcome.
    ///
    /// After this returns `Succeeded`, the cache write (if configured) has
    /// also been attempted.
    pub async fn wait_for_refresh(&self) -> RefreshStatus {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|snapshot| snapshot.refresh.is_settled()).await {
            Ok(snapshot) => snapshot.refresh,
            Err(_) => self.state.borrow().refresh,
        }
    }

    /// The merged view: remote entries shadow local ones.
    pub fn dump(&self) -> Document {
        self.state.borrow().remote.overlay(self.local.document())
    }

    /// The current remote document (empty until a fetch succeeds).
    pub fn remote_document(&self) -> Arc<Document> {
        Arc::clone(&self.state.borrow().remote)
    }

    /// The local document and whether it came from the cache or the fallback.
    pub fn local_document(&self) -> &LocalDocument {
        &self.local
    }
}

impl fmt::Display for ConfigResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.dump(), f)
    }
}

/// Loads the cache if one is usable, else the fallback.
async fn load_local<F: DocumentFetcher>(
    fetcher: &F,
    cache: Option<&CacheFile>,
    fallback: &Location,
) -> Result<LocalDocument, ResolverError> {
    if let Some(cache) = cache {
        match cache.read().await {
            Ok(document) => {
                info!(path = %cache.path().display(), "Reading cached config");
                return Ok(LocalDocument::Cache(document));
            }
            Err(CacheError::NotFound { .. }) => {
                debug!(path = %cache.path().display(), "No cached config");
            }
            Err(e @ CacheError::Malformed { .. }) => {
                warn!(error = %e, "Cached config is corrupt, using fallback");
                match cache.set_aside_corrupt().await {
                    Ok(backup) => {
                        warn!(backup = %backup.display(), "Corrupt cache moved aside");
                    }
                    Err(err) => {
                        warn!(error = %err, "Failed to move corrupt cache aside");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Cached config is unreadable, using fallback");
            }
        }
    }

    info!(location = %fallback, "Reading fallback config");
    let document = fetcher
        .fetch(fallback)
        .await
        .map_err(|source| ResolverError::FallbackUnreadable {
            location: fallback.to_string(),
            source,
        })?;

    Ok(LocalDocument::Fallback(document))
}

/// The single remote refresh of one resolver.
///
/// Dropping it while the refresh is still pending (a panicking fetcher or a
/// runtime shutting down) settles the refresh as `Failed`.
struct RemoteRefresh {
    app_name: String,
    remote: Location,
    cache: Option<CacheFile>,
    state: Arc<watch::Sender<Snapshot>>,
}

impl RemoteRefresh {
    async fn run<F: DocumentFetcher>(self, fetcher: &F) -> RefreshStatus {
        info!(location = %self.remote, "Trying to read remote config");

        let document = match fetcher.fetch(&self.remote).await {
            Ok(document) => Arc::new(document),
            Err(e) => {
                warn!(
                    location = %self.remote,
                    error = %e,
                    "Failed to read remote config, keeping local config"
                );
                self.state
                    .send_modify(|snapshot| snapshot.refresh = RefreshStatus::Failed);
                return RefreshStatus::Failed;
            }
        };

        // Publish the document and the flag together; the refresh stays
        // pending until the cache write below has been attempted.
        self.state.send_modify(|snapshot| {
            snapshot.remote = Arc::clone(&document);
            snapshot.source = ActiveSource::Online;
        });
        info!(
            location = %self.remote,
            entries = document.len(),
            "Import of remote config successful"
        );

        if let Some(cache) = &self.cache {
            info!(path = %cache.path().display(), "Caching remote config for offline use");
            let header = cache_header(&self.app_name);
            if let Err(e) = cache.write(&document, Some(&header)).await {
                warn!(error = %e, "Failed to cache remote config");
            }
        }

        self.state
            .send_modify(|snapshot| snapshot.refresh = RefreshStatus::Succeeded);
        RefreshStatus::Succeeded
    }
}

impl Drop for RemoteRefresh {
    fn drop(&mut self) {
        let abandoned = self.state.send_if_modified(|snapshot| {
            if snapshot.refresh == RefreshStatus::Pending {
                snapshot.refresh = RefreshStatus::Failed;
                true
            } else {
                false
            }
        });

        if abandoned {
            warn!(
                location = %self.remote,
                "Remote config refresh ended without a result, keeping local config"
            );
        }
    }
}
