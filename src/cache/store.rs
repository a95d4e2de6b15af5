use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::debug;

/// Storage key of the monolithic snapshot document.
pub const DATA_KEY: &str = "data";

/// Durable key/value persistence for serialized documents.
///
/// Reads never fail: an unreadable or missing entry is a miss. Writes are
/// last-write-wins with no versioning and no eviction.
pub trait CacheStore: Send + Sync {
    /// Read the raw content stored under `key`, or `None` on a miss.
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the content stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed cache store: one `<key>.json` file per key.
pub struct FileCacheStore {
    cache_dir: PathBuf,
}

impl FileCacheStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache dir {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => Some(contents),
            Err(e) => {
                debug!(key, error = %e, "Failed to read cache entry, treating as miss");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(key);
        std::fs::write(&path, value)
            .with_context(|| format!("Failed to write cache entry {}", key))?;
        Ok(())
    }
}

/// In-memory cache store with the same contract.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_cache_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stagecache-test-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryCacheStore::new();
        assert_eq!(store.get(DATA_KEY), None);

        store.set(DATA_KEY, "{\"a\":1}").unwrap();
        assert_eq!(store.get(DATA_KEY).as_deref(), Some("{\"a\":1}"));

        // Last write wins
        store.set(DATA_KEY, "{\"a\":2}").unwrap();
        assert_eq!(store.get(DATA_KEY).as_deref(), Some("{\"a\":2}"));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = temp_cache_dir("file-roundtrip");
        let store = FileCacheStore::new(dir.clone()).unwrap();

        assert_eq!(store.get(DATA_KEY), None);
        store.set(DATA_KEY, "payload").unwrap();
        assert_eq!(store.get(DATA_KEY).as_deref(), Some("payload"));

        // A fresh instance over the same directory sees the write
        let reopened = FileCacheStore::new(dir.clone()).unwrap();
        assert_eq!(reopened.get(DATA_KEY).as_deref(), Some("payload"));

        let _ = std::fs::remove_dir_all(dir);
    }
}
