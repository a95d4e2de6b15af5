//! Best-effort warming of artist portrait images.
//!
//! Warming exists solely to pre-populate the HTTP cache for the rendering
//! layer. It runs detached from the primary fetch, every failure is absorbed
//! locally, and nothing is ever surfaced to a caller.

use futures::stream::{self, StreamExt};
use reqwest::Client;
use tokio::task::JoinHandle;
use tracing::debug;

/// Maximum concurrent warming requests.
/// Bounded to avoid overwhelming the festival server right after a fetch.
const MAX_CONCURRENT_WARMS: usize = 8;

/// Fire-and-forget portrait warmer.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ImagePrefetcher {
    client: Client,
}

impl ImagePrefetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Spawn a detached task that warms every URL in `urls`.
    ///
    /// Requests run concurrently up to `MAX_CONCURRENT_WARMS`; each failure
    /// is logged at debug and swallowed. The returned handle is for tests
    /// only; production callers drop it and let the task outlive the fetch.
    pub fn spawn_warm(&self, urls: Vec<String>) -> JoinHandle<()> {
        let client = self.client.clone();
        tokio::spawn(async move {
            let total = urls.len();
            stream::iter(urls)
                .map(|url| {
                    let client = client.clone();
                    async move {
                        match client.get(&url).send().await {
                            Ok(response) => {
                                // Drain the body so the bytes actually travel
                                let _ = response.bytes().await;
                                debug!(url = %url, "Warmed image");
                            }
                            Err(e) => debug!(url = %url, error = %e, "Image warm failed"),
                        }
                    }
                })
                .buffer_unordered(MAX_CONCURRENT_WARMS)
                .for_each(|_| async {})
                .await;
            debug!(total, "Image warm pass finished");
        })
    }
}

impl Default for ImagePrefetcher {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_list_completes() {
        let prefetcher = ImagePrefetcher::default();
        prefetcher.spawn_warm(vec![]).await.unwrap();
    }

    #[tokio::test]
    async fn test_failures_are_swallowed() {
        let prefetcher = ImagePrefetcher::default();
        // Neither an invalid URL nor an unreachable one propagates anything.
        let handle = prefetcher.spawn_warm(vec![
            "not a url".to_string(),
            "http://127.0.0.1:1/missing.jpg".to_string(),
        ]);
        handle.await.unwrap();
    }
}
