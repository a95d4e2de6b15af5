//! Persisted user preferences.
//!
//! `PreferenceStore<T>` is a generic persisted reactive cell bound to one
//! storage key. One instance exists per preference: the liked-artist set,
//! the "show liked only" flag, and the chosen language. Writes persist
//! synchronously; changes made by another execution context arrive through
//! `apply_external` and converge on last-physical-write-wins.

pub mod store;

pub use store::PreferenceStore;

/// Storage key of the "show liked only" flag.
pub const FILTER_LIKED_KEY: &str = "filterLiked";

/// Storage key of the liked-artist slug list.
pub const LIKED_ARTISTS_KEY: &str = "likedArtists";

/// Storage key of the chosen language.
pub const LANGUAGE_KEY: &str = "language";
