//! Offline-first data layer for a festival companion app.
//!
//! The crate turns the remote festival dataset (artists, locations,
//! scheduled sessions) into a locally cached, relationally joined snapshot,
//! kept fresh within a bounded staleness window and gracefully degraded when
//! the network is unavailable:
//!
//! - `api`: HTTP client for the locale-scoped catalog endpoint
//! - `join`: pure relational join of the raw payload into a `Snapshot`
//! - `cache`: durable single-document snapshot persistence
//! - `orchestrator`: cache-hit vs. network-fetch vs. fallback policy
//! - `prefetch`: fire-and-forget artist portrait warming
//! - `prefs`: persisted reactive preference cells with cross-context sync
//! - `facade`: the one interface consumers depend on

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod facade;
pub mod join;
pub mod models;
pub mod orchestrator;
pub mod prefetch;
pub mod prefs;

pub use api::ApiClient;
pub use error::DataError;
pub use facade::{DataFacade, LoadState};
pub use models::{Artist, Locale, Location, Session, Snapshot};
