//! API client for the festival content API.
//!
//! The endpoint is unauthenticated and locale-scoped: `GET {base}/{locale}/api/`
//! returns the full catalog as one JSON document.

use std::future::Future;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DataError;
use crate::models::{Artist, Locale, Location};

/// HTTP request timeout in seconds.
/// 30s allows for slow responses over festival-site connectivity while
/// failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// The catalog payload exactly as the server sends it: artists and locations
/// are already in their final shape, sessions still reference artist and
/// location by slug and carry raw instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCatalog {
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub sessions: Vec<RawSession>,
}

/// One schedule entry on the wire. `artist`/`location` are slug references,
/// `start`/`end` are ISO-8601 instants. `slug` is optional because older
/// exports identify a session only by its artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSession {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: String,
    pub end: String,
}

/// The network edge the orchestrator fetches through.
///
/// `ApiClient` is the production implementation; tests substitute an
/// in-memory source to exercise the cache policy without a server.
pub trait CatalogSource {
    fn fetch_catalog(
        &self,
        locale: Locale,
    ) -> impl Future<Output = Result<RawCatalog, DataError>> + Send;
}

/// HTTP client for the festival content API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Reuse an existing `reqwest::Client` (shares its connection pool).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn catalog_url(&self, locale: Locale) -> String {
        format!("{}/{}/api/", self.base_url, locale)
    }
}

impl CatalogSource for ApiClient {
    async fn fetch_catalog(&self, locale: Locale) -> Result<RawCatalog, DataError> {
        let url = self.catalog_url(locale);
        debug!(url = %url, "Fetching catalog");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(DataError::Http(response.status()));
        }

        let body = response.text().await?;
        let catalog: RawCatalog = serde_json::from_str(&body)?;
        debug!(
            artists = catalog.artists.len(),
            locations = catalog.locations.len(),
            sessions = catalog.sessions.len(),
            "Catalog fetched"
        );
        Ok(catalog)
    }
}
