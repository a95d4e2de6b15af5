//! Data models for the festival dataset.
//!
//! This module contains all the data structures used to represent
//! festival data including:
//!
//! - `Artist`: lineup entries with portrait and genre info
//! - `Location`: stages and service points with optional map coordinates
//! - `Session`: scheduled performances with embedded artist/location copies
//! - `Snapshot`: the complete joined dataset persisted as one unit
//! - `Locale`: the closed set of content locales

pub mod artist;
pub mod locale;
pub mod location;
pub mod session;
pub mod snapshot;

pub use artist::Artist;
pub use locale::Locale;
pub use location::Location;
pub use session::Session;
pub use snapshot::{Snapshot, FRESHNESS_WINDOW_MS};
