//! REST API client module for the festival content endpoint.
//!
//! This module provides the `ApiClient` for fetching the locale-specific
//! catalog payload (artists, locations, raw schedule), the raw wire types it
//! parses into, and the `CatalogSource` seam the orchestrator fetches
//! through.

pub mod client;

pub use client::{ApiClient, CatalogSource, RawCatalog, RawSession};
