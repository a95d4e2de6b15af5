//! The single contract boundary exposed to consumers.
//!
//! `DataFacade` composes the orchestrator's asynchronous result with the
//! preference cells. Consumers read collections that default to empty while
//! loading or errored, observe the `Idle -> Loading -> {Ready | Errored}`
//! state machine through a watch channel, and read/write preferences without
//! ever seeing the orchestrator or cache internals.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::debug;

use crate::api::CatalogSource;
use crate::error::DataError;
use crate::models::{Artist, Locale, Location, Session, Snapshot};
use crate::orchestrator::FetchOrchestrator;
use crate::prefs::{PreferenceStore, FILTER_LIKED_KEY, LANGUAGE_KEY, LIKED_ARTISTS_KEY};

/// One fetch cycle's observable state.
///
/// `Ready` and `Errored` are stable until the next cycle begins; a new cycle
/// starts whenever the `(locale, force_refetch)` request key changes.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready(Arc<Snapshot>),
    Errored(Arc<DataError>),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            LoadState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Arc<DataError>> {
        match self {
            LoadState::Errored(error) => Some(error),
            _ => None,
        }
    }
}

/// Facade over the snapshot pipeline and the preference cells.
pub struct DataFacade<S> {
    orchestrator: FetchOrchestrator<S>,
    state: watch::Sender<LoadState>,
    generation: AtomicU64,
    filter_liked: PreferenceStore<bool>,
    liked_artists: PreferenceStore<Vec<String>>,
    language: PreferenceStore<Locale>,
}

impl<S: CatalogSource> DataFacade<S> {
    /// Build the facade; preference cells persist under `prefs_dir`.
    pub fn new(orchestrator: FetchOrchestrator<S>, prefs_dir: &Path) -> Result<Self> {
        let filter_liked = PreferenceStore::open(prefs_dir, FILTER_LIKED_KEY, false)?;
        let liked_artists = PreferenceStore::open(prefs_dir, LIKED_ARTISTS_KEY, Vec::new())?;
        let language = PreferenceStore::open(prefs_dir, LANGUAGE_KEY, Locale::default())?;
        let (state, _) = watch::channel(LoadState::Idle);

        Ok(Self {
            orchestrator,
            state,
            generation: AtomicU64::new(0),
            filter_liked,
            liked_artists,
            language,
        })
    }

    // =========================================================================
    // Fetch cycle
    // =========================================================================

    /// Run one fetch cycle for `(locale, force_refetch)`.
    ///
    /// The cycle takes a fresh generation number at its start; if another
    /// cycle begins while this one is in flight, the older resolution is
    /// discarded instead of overwriting newer state. The returned value is
    /// this cycle's own outcome either way.
    pub async fn load(&self, locale: Locale, force_refetch: bool) -> LoadState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(LoadState::Loading);

        let outcome = match self.orchestrator.snapshot(locale, force_refetch).await {
            Ok(snapshot) => LoadState::Ready(Arc::new(snapshot)),
            Err(error) => LoadState::Errored(Arc::new(error)),
        };

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding superseded fetch result");
            return outcome;
        }

        self.state.send_replace(outcome.clone());
        outcome
    }

    /// Publish the persisted snapshot without touching the network, for
    /// offline startup display.
    pub fn restore(&self) -> LoadState {
        let outcome = match self.orchestrator.cached() {
            Ok(snapshot) => LoadState::Ready(Arc::new(snapshot)),
            Err(error) => LoadState::Errored(Arc::new(error)),
        };
        self.state.send_replace(outcome.clone());
        outcome
    }

    /// Drive fetch cycles off an externally supplied locale accessor: one
    /// cycle immediately, then one per change. `force_once` forces a refetch
    /// on the first cycle only (the invalidation query parameter). Returns
    /// when the locale source is dropped.
    pub async fn follow(&self, mut locales: watch::Receiver<Locale>, force_once: bool) {
        let mut force_refetch = force_once;
        loop {
            let locale = *locales.borrow_and_update();
            self.load(locale, force_refetch).await;
            force_refetch = false;
            if locales.changed().await.is_err() {
                break;
            }
        }
    }

    /// Observe state transitions.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    // =========================================================================
    // Snapshot accessors
    // =========================================================================

    pub fn loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn error(&self) -> Option<Arc<DataError>> {
        self.state.borrow().error().cloned()
    }

    /// Fetch time of the current snapshot in epoch ms, 0 while none is ready.
    pub fn timestamp(&self) -> i64 {
        self.state.borrow().snapshot().map_or(0, |s| s.timestamp)
    }

    pub fn artists(&self) -> Vec<Artist> {
        self.state
            .borrow()
            .snapshot()
            .map_or_else(Vec::new, |s| s.artists.clone())
    }

    pub fn locations(&self) -> Vec<Location> {
        self.state
            .borrow()
            .snapshot()
            .map_or_else(Vec::new, |s| s.locations.clone())
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.state
            .borrow()
            .snapshot()
            .map_or_else(Vec::new, |s| s.sessions.clone())
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    pub fn filter_liked(&self) -> bool {
        self.filter_liked.get()
    }

    pub fn set_filter_liked(&self, value: bool) -> Result<()> {
        self.filter_liked.set(value)
    }

    pub fn liked_artists(&self) -> Vec<String> {
        self.liked_artists.get()
    }

    /// Persist the liked-artist set. The list is a logical set: duplicates
    /// are dropped at this boundary, first occurrence wins.
    pub fn set_liked_artists(&self, slugs: Vec<String>) -> Result<()> {
        let mut deduped: Vec<String> = Vec::with_capacity(slugs.len());
        for slug in slugs {
            if !deduped.contains(&slug) {
                deduped.push(slug);
            }
        }
        self.liked_artists.set(deduped)
    }

    pub fn language(&self) -> Locale {
        self.language.get()
    }

    pub fn set_language(&self, locale: Locale) -> Result<()> {
        self.language.set(locale)
    }

    /// Route a storage change made by another execution context to the
    /// matching preference cell. Unknown keys are ignored.
    pub fn notify_preference_changed(&self, key: &str, raw: &str) {
        match key {
            FILTER_LIKED_KEY => self.filter_liked.apply_external(raw),
            LIKED_ARTISTS_KEY => self.liked_artists.apply_external(raw),
            LANGUAGE_KEY => self.language.apply_external(raw),
            other => debug!(key = other, "Ignoring storage change for unknown key"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use crate::api::RawCatalog;
    use crate::cache::{CacheStore, MemoryCacheStore, DATA_KEY};
    use crate::models::FRESHNESS_WINDOW_MS;
    use crate::prefetch::ImagePrefetcher;

    /// Source whose per-locale delay makes overlapping cycles deterministic.
    struct MockSource {
        calls: AtomicUsize,
        de_delay: Duration,
        en_delay: Duration,
        fail: bool,
    }

    impl MockSource {
        fn instant() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                de_delay: Duration::ZERO,
                en_delay: Duration::ZERO,
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::instant()
            }
        }

        fn slow_de() -> Self {
            Self {
                de_delay: Duration::from_millis(100),
                en_delay: Duration::from_millis(10),
                ..Self::instant()
            }
        }
    }

    impl CatalogSource for MockSource {
        async fn fetch_catalog(&self, locale: Locale) -> Result<RawCatalog, DataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = match locale {
                Locale::De => self.de_delay,
                Locale::En => self.en_delay,
            };
            tokio::time::sleep(delay).await;
            if self.fail {
                return Err(DataError::Http(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
            }
            Ok(RawCatalog {
                artists: vec![Artist {
                    slug: format!("fresh-{}", locale),
                    name: "Fresh".to_string(),
                    label: None,
                    genre: String::new(),
                    url: None,
                    description: String::new(),
                    image_url: None,
                }],
                locations: vec![],
                sessions: vec![],
            })
        }
    }

    fn temp_prefs_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stagecache-facade-{}-{}", tag, std::process::id()))
    }

    fn facade(source: MockSource, tag: &str) -> DataFacade<MockSource> {
        let orchestrator = FetchOrchestrator::new(
            source,
            Arc::new(MemoryCacheStore::new()),
            ImagePrefetcher::default(),
        );
        DataFacade::new(orchestrator, &temp_prefs_dir(tag)).unwrap()
    }

    fn cleanup(tag: &str) {
        let _ = std::fs::remove_dir_all(temp_prefs_dir(tag));
    }

    #[tokio::test]
    async fn test_initial_state_is_idle_and_empty() {
        let facade = facade(MockSource::instant(), "idle");
        assert!(!facade.loading());
        assert!(facade.error().is_none());
        assert_eq!(facade.timestamp(), 0);
        assert!(facade.artists().is_empty());
        assert!(facade.locations().is_empty());
        assert!(facade.sessions().is_empty());
        cleanup("idle");
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_transitions_through_loading_to_ready() {
        let facade = facade(MockSource::slow_de(), "transitions");

        let (outcome, _) = tokio::join!(facade.load(Locale::De, false), async {
            // The cycle publishes Loading synchronously before suspending
            assert!(facade.loading());
        });

        assert!(outcome.snapshot().is_some());
        assert!(!facade.loading());
        assert_eq!(facade.artists()[0].slug, "fresh-de");
        assert!(facade.timestamp() > 0);
        cleanup("transitions");
    }

    #[tokio::test]
    async fn test_errored_cycle_keeps_collections_empty() {
        let facade = facade(MockSource::failing(), "errored");
        let outcome = facade.load(Locale::De, false).await;

        assert!(outcome.error().is_some());
        assert!(facade.error().is_some());
        assert!(facade.artists().is_empty());
        assert!(facade.sessions().is_empty());
        assert_eq!(facade.timestamp(), 0);
        cleanup("errored");
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_cycle_never_overwrites_newer_state() {
        let facade = facade(MockSource::slow_de(), "superseded");

        // The de cycle starts first but resolves after the en cycle.
        tokio::join!(facade.load(Locale::De, true), facade.load(Locale::En, true));

        assert_eq!(facade.artists()[0].slug, "fresh-en");
        cleanup("superseded");
    }

    #[tokio::test]
    async fn test_restore_publishes_persisted_snapshot() {
        let cache = Arc::new(MemoryCacheStore::new());
        let snapshot = Snapshot {
            artists: vec![],
            locations: vec![],
            sessions: vec![],
            timestamp: FRESHNESS_WINDOW_MS,
            locale: Locale::De,
        };
        cache
            .set(DATA_KEY, &serde_json::to_string(&snapshot).unwrap())
            .unwrap();

        let orchestrator = FetchOrchestrator::new(
            MockSource::instant(),
            cache as Arc<dyn CacheStore>,
            ImagePrefetcher::default(),
        );
        let facade = DataFacade::new(orchestrator, &temp_prefs_dir("restore")).unwrap();

        let outcome = facade.restore();
        assert_eq!(outcome.snapshot().unwrap().timestamp, FRESHNESS_WINDOW_MS);
        assert_eq!(facade.timestamp(), FRESHNESS_WINDOW_MS);
        cleanup("restore");
    }

    #[tokio::test]
    async fn test_restore_without_cache_errors() {
        let facade = facade(MockSource::instant(), "restore-empty");
        let outcome = facade.restore();
        assert!(matches!(
            outcome.error().map(|e| e.as_ref()),
            Some(DataError::NoCacheAvailable)
        ));
        cleanup("restore-empty");
    }

    #[tokio::test]
    async fn test_follow_reloads_on_locale_change() {
        let facade = Arc::new(facade(MockSource::instant(), "follow"));
        let (locale_tx, locale_rx) = watch::channel(Locale::De);
        let mut state_rx = facade.subscribe();

        let driver = Arc::clone(&facade);
        let handle = tokio::spawn(async move { driver.follow(locale_rx, false).await });

        loop {
            state_rx.changed().await.unwrap();
            let done = matches!(&*state_rx.borrow(), LoadState::Ready(s) if s.locale == Locale::De);
            if done {
                break;
            }
        }

        locale_tx.send(Locale::En).unwrap();
        loop {
            state_rx.changed().await.unwrap();
            let done = matches!(&*state_rx.borrow(), LoadState::Ready(s) if s.locale == Locale::En);
            if done {
                break;
            }
        }

        drop(locale_tx);
        handle.await.unwrap();
        cleanup("follow");
    }

    #[tokio::test]
    async fn test_liked_artists_dedup_at_write_boundary() {
        let facade = facade(MockSource::instant(), "dedup");
        facade
            .set_liked_artists(vec![
                "a".to_string(),
                "b".to_string(),
                "a".to_string(),
                "c".to_string(),
                "b".to_string(),
            ])
            .unwrap();
        assert_eq!(
            facade.liked_artists(),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        cleanup("dedup");
    }

    #[tokio::test]
    async fn test_external_change_updates_preferences_without_write() {
        let facade = facade(MockSource::instant(), "external");
        facade.set_liked_artists(vec!["a".to_string()]).unwrap();

        facade.notify_preference_changed(LIKED_ARTISTS_KEY, "[\"c\"]");
        assert_eq!(facade.liked_artists(), vec!["c".to_string()]);

        facade.notify_preference_changed(LANGUAGE_KEY, "\"en\"");
        assert_eq!(facade.language(), Locale::En);

        // Unknown keys are ignored
        facade.notify_preference_changed("theme", "\"dark\"");
        cleanup("external");
    }

    #[tokio::test]
    async fn test_filter_liked_roundtrip() {
        let facade = facade(MockSource::instant(), "filter");
        assert!(!facade.filter_liked());
        facade.set_filter_liked(true).unwrap();
        assert!(facade.filter_liked());
        cleanup("filter");
    }
}
