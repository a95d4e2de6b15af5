use thiserror::Error;

/// Error taxonomy of the data layer.
///
/// `Network` and `Parse` during a fetch are recovered locally by falling back
/// to any cached snapshot; only the complete absence of cached data surfaces
/// an error to consumers.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned status {0}")]
    Http(reqwest::StatusCode),

    #[error("Malformed response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No cached snapshot available")]
    NoCacheAvailable,
}

impl DataError {
    /// Whether the error came from the network edge (transport failure or
    /// non-success response) rather than from local state.
    pub fn is_network(&self) -> bool {
        matches!(self, DataError::Network(_) | DataError::Http(_))
    }
}
