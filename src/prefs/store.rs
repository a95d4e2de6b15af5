use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

/// A persisted reactive cell of type `T` bound to one storage key.
///
/// Construction reads the persisted value, falling back to the supplied
/// default when the key is absent or its content is malformed. Every `set`
/// persists synchronously and is immediately visible to the writer.
/// `apply_external` folds in a value written by another execution context
/// without persisting it again; re-applying the current value is a no-op in
/// effect, so self-originated notifications need no deduplication.
pub struct PreferenceStore<T> {
    key: String,
    path: PathBuf,
    cell: watch::Sender<T>,
}

impl<T> PreferenceStore<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned,
{
    /// Open the cell stored at `<dir>/<key>.json`, seeding it with the
    /// persisted value or `default`.
    pub fn open(dir: &Path, key: &str, default: T) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create preference dir {}", dir.display()))?;
        let path = dir.join(format!("{}.json", key));

        let initial = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(value) => value,
                Err(e) => {
                    debug!(key, error = %e, "Malformed persisted preference, using default");
                    default
                }
            },
            Err(_) => default,
        };

        let (cell, _) = watch::channel(initial);
        Ok(Self {
            key: key.to_string(),
            path,
            cell,
        })
    }

    /// Current value of the cell.
    pub fn get(&self) -> T {
        self.cell.borrow().clone()
    }

    /// Write a new value: visible immediately, persisted synchronously.
    pub fn set(&self, value: T) -> Result<()> {
        self.cell.send_replace(value.clone());
        let contents = serde_json::to_string(&value)
            .with_context(|| format!("Failed to serialize preference {}", self.key))?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to persist preference {}", self.key))?;
        Ok(())
    }

    /// Fold in a raw value persisted by another execution context.
    ///
    /// Updates the in-memory cell only; the other context already owns the
    /// physical write. Malformed payloads are ignored.
    pub fn apply_external(&self, raw: &str) {
        match serde_json::from_str::<T>(raw) {
            Ok(value) => {
                self.cell.send_if_modified(|current| {
                    if *current != value {
                        *current = value;
                        true
                    } else {
                        false
                    }
                });
            }
            Err(e) => debug!(key = %self.key, error = %e, "Ignoring malformed external preference"),
        }
    }

    /// Observe value changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.cell.subscribe()
    }

    /// The storage key this cell is bound to.
    pub fn key(&self) -> &str {
        &self.key
    }
}
