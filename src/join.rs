//! Relational join of the raw catalog payload.
//!
//! Pure transform: the raw server payload becomes a `Snapshot` whose sessions
//! embed resolved artist/location copies and pre-derived, locale-independent
//! time fields. Slug references are resolved by first match; unresolved
//! references leave the corresponding field unset.

use chrono::{DateTime, FixedOffset};
use tracing::warn;

use crate::api::{RawCatalog, RawSession};
use crate::models::{Artist, Locale, Location, Session, Snapshot};

/// Build the joined snapshot from a raw catalog payload.
///
/// `timestamp` is the epoch-ms fetch time stamped onto the snapshot.
/// Sessions whose instants cannot be parsed are dropped rather than carried
/// as garbage; everything else survives verbatim.
pub fn build_snapshot(catalog: RawCatalog, locale: Locale, timestamp: i64) -> Snapshot {
    let RawCatalog {
        artists,
        locations,
        sessions,
    } = catalog;

    let sessions = sessions
        .iter()
        .filter_map(|raw| join_session(raw, &artists, &locations))
        .collect();

    Snapshot {
        artists,
        locations,
        sessions,
        timestamp,
        locale,
    }
}

fn join_session(raw: &RawSession, artists: &[Artist], locations: &[Location]) -> Option<Session> {
    let start = parse_instant(&raw.start, &raw.name)?;
    let end = parse_instant(&raw.end, &raw.name)?;

    let artist = raw
        .artist
        .as_deref()
        .and_then(|slug| artists.iter().find(|a| a.slug == slug))
        .cloned();
    let location = raw
        .location
        .as_deref()
        .and_then(|slug| locations.iter().find(|l| l.slug == slug))
        .cloned();

    Some(Session {
        slug: session_slug(raw),
        name: raw.name.clone(),
        date: start.format("%Y-%m-%d").to_string(),
        time_start: start.format("%H:%M").to_string(),
        time_end: end.format("%H:%M").to_string(),
        date_start: start,
        date_end: end,
        duration: (end - start).num_seconds() as f64 / 3600.0,
        artist,
        location,
    })
}

/// Unique session identifier.
///
/// The upstream may provide one; older exports only identify a session by its
/// artist, which collides when one artist plays twice. The derived fallback
/// `<artist>@<start>` stays unique per (artist, start instant) and stable
/// across refetches.
fn session_slug(raw: &RawSession) -> String {
    if let Some(slug) = raw.slug.as_deref().filter(|s| !s.is_empty()) {
        return slug.to_string();
    }
    let base = raw.artist.as_deref().unwrap_or(&raw.name);
    format!("{}@{}", base, raw.start)
}

fn parse_instant(value: &str, session_name: &str) -> Option<DateTime<FixedOffset>> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(instant) => Some(instant),
        Err(e) => {
            warn!(session = session_name, value, error = %e, "Dropping session with unparsable instant");
            None
        }
    }
}
