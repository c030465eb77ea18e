//! Persisted key-value storage seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! In the browser this is `localStorage` (see `client::util::storage`); in
//! tests and on native hosts it is [`MemoryStore`]. Storage is a best-effort
//! backup: callers log failures and carry on as if the value was forgotten.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Namespace shared by every key the core writes.
pub const KEY_PREFIX: &str = "memberhub.";

/// Prefix for per-entity "liked" flags.
pub const LIKED_KEY_PREFIX: &str = "memberhub.liked.";

/// Storage key of the "liked" flag for `entity_id`.
#[must_use]
pub fn liked_key(entity_id: &str) -> String {
    format!("{LIKED_KEY_PREFIX}{entity_id}")
}

/// Synchronous string store, the shape of browser `localStorage`.
pub trait KeyValueStore: Send + Sync {
    /// Read `key`. `Ok(None)` means absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when storage cannot be reached.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when storage cannot be reached.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when storage cannot be reached.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Load a JSON value stored under `key`. Missing, unreadable, or malformed
/// values all read as `None`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            tracing::debug!(%key, error = %e, "storage read failed");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(%key, error = %e, "discarding malformed stored value");
            None
        }
    }
}

/// Save `value` as JSON under `key`.
///
/// # Errors
///
/// Returns [`StorageError::Encode`] if serialization fails, or the store's
/// own error if the write fails.
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Encode(e.to_string()))?;
    store.set(key, &raw)
}

/// Read a boolean flag written by [`write_flag`]. Anything else reads `false`.
pub fn read_flag(store: &dyn KeyValueStore, key: &str) -> bool {
    matches!(store.get(key), Ok(Some(v)) if v == "true")
}

/// Persist a boolean flag. `false` removes the key. Failures are logged.
pub fn write_flag(store: &dyn KeyValueStore, key: &str, value: bool) {
    let result = if value { store.set(key, "true") } else { store.remove(key) };
    if let Err(e) = result {
        tracing::warn!(%key, value, error = %e, "flag not persisted; it will be forgotten on reload");
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store. Used on native hosts, in tests, and as the fallback
/// when the browser refuses `localStorage`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }
}
