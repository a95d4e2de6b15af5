//! Fetch-or-reuse decision logic.
//!
//! The orchestrator owns the staleness and locale-invalidation policy:
//! a cached snapshot that is fresh and locale-matched wins outright; anything
//! else goes to the network, with the cache as a degraded fallback when the
//! network is unreachable. Staleness is tolerated only as a fallback for
//! unreachability, never as the default path while the network is up.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::api::CatalogSource;
use crate::cache::{CacheStore, DATA_KEY};
use crate::error::DataError;
use crate::join;
use crate::models::{Locale, Snapshot};
use crate::prefetch::ImagePrefetcher;

/// Cache-hit vs. network-fetch vs. fallback policy over one snapshot document.
pub struct FetchOrchestrator<S> {
    source: S,
    cache: Arc<dyn CacheStore>,
    prefetcher: ImagePrefetcher,
}

impl<S: CatalogSource> FetchOrchestrator<S> {
    pub fn new(source: S, cache: Arc<dyn CacheStore>, prefetcher: ImagePrefetcher) -> Self {
        Self {
            source,
            cache,
            prefetcher,
        }
    }

    /// Produce a snapshot for `(locale, force_refetch)`.
    ///
    /// Policy, in order: reuse the cached snapshot when it is fresh,
    /// locale-matched and no refetch is forced; otherwise fetch, join,
    /// persist, kick off image warming and return the new snapshot; on fetch
    /// failure fall back to any cached snapshot regardless of its own
    /// staleness or locale. Only the no-cache-at-all case propagates the
    /// fetch error.
    pub async fn snapshot(&self, locale: Locale, force_refetch: bool) -> Result<Snapshot, DataError> {
        let cached = self.read_cached();

        if !force_refetch {
            if let Some(snapshot) = &cached {
                if snapshot.satisfies(locale, now_ms()) {
                    debug!(%locale, "Using cached snapshot");
                    return Ok(snapshot.clone());
                }
            }
        }

        debug!(%locale, force_refetch, "Fetching catalog from API");
        let raw = match self.source.fetch_catalog(locale).await {
            Ok(raw) => raw,
            Err(e) => {
                return match cached {
                    Some(snapshot) => {
                        warn!(error = %e, "Catalog fetch failed, falling back to cached snapshot");
                        Ok(snapshot)
                    }
                    None => {
                        warn!(error = %e, "Catalog fetch failed and no cached snapshot exists");
                        Err(e)
                    }
                };
            }
        };

        let snapshot = join::build_snapshot(raw, locale, now_ms());
        self.persist(&snapshot);
        self.prefetcher.spawn_warm(snapshot.image_urls());
        Ok(snapshot)
    }

    /// The persisted snapshot, for offline startup display.
    pub fn cached(&self) -> Result<Snapshot, DataError> {
        self.read_cached().ok_or(DataError::NoCacheAvailable)
    }

    fn read_cached(&self) -> Option<Snapshot> {
        let contents = self.cache.get(DATA_KEY)?;
        match serde_json::from_str(&contents) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                debug!(error = %e, "Malformed cached snapshot, treating as miss");
                None
            }
        }
    }

    /// Persist the snapshot wholesale. A failed write degrades the next
    /// startup, not this fetch, so it is logged and swallowed.
    fn persist(&self, snapshot: &Snapshot) {
        match serde_json::to_string(snapshot) {
            Ok(contents) => {
                if let Err(e) = self.cache.set(DATA_KEY, &contents) {
                    warn!(error = %e, "Failed to persist snapshot");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize snapshot"),
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
