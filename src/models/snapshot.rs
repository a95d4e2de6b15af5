use serde::{Deserialize, Serialize};

use super::{Artist, Locale, Location, Session};

/// Consider a snapshot stale after 1 hour.
/// Balances freshness with reducing unnecessary API calls for slowly-changing data.
pub const FRESHNESS_WINDOW_MS: i64 = 60 * 60 * 1000;

/// The complete joined dataset, held in memory and persisted as a unit.
///
/// A snapshot is only ever replaced wholesale; partial updates are never
/// applied. `timestamp` is the epoch-millisecond fetch time, `locale` the
/// locale the payload was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub artists: Vec<Artist>,
    pub locations: Vec<Location>,
    pub sessions: Vec<Session>,
    pub timestamp: i64,
    pub locale: Locale,
}

impl Snapshot {
    /// Whether this snapshot is still inside the freshness window at `now_ms`.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp < FRESHNESS_WINDOW_MS
    }

    /// Whether the snapshot can be reused for a request: fresh and fetched
    /// for the same locale.
    pub fn satisfies(&self, locale: Locale, now_ms: i64) -> bool {
        self.locale == locale && self.is_fresh(now_ms)
    }

    /// Portrait URLs of all artists that carry one, for image warming.
    pub fn image_urls(&self) -> Vec<String> {
        self.artists
            .iter()
            .filter_map(|a| a.portrait_url())
            .map(str::to_string)
            .collect()
    }
}
