//! Browser `localStorage` behind the core's `KeyValueStore` seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! `web_sys::Storage` handles cannot cross threads, so the store looks the
//! handle up on every call. Without the `csr` feature (native tests) every
//! call reports storage as unavailable, which the core treats as "forgotten".

use memberhub::{KeyValueStore, StorageError};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "csr")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| StorageError::Unavailable("localStorage is not accessible".into()))
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.get_item(key).map_err(|_| StorageError::Unavailable(format!("read of {key} refused")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable("no browser".into()))
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?
                .set_item(key, value)
                .map_err(|_| StorageError::Unavailable(format!("write of {key} refused")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable("no browser".into()))
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.remove_item(key).map_err(|_| StorageError::Unavailable(format!("delete of {key} refused")))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable("no browser".into()))
        }
    }
}

/// `localStorage` when the browser grants it, else an in-memory store that
/// lasts until reload.
pub fn browser_or_memory() -> std::sync::Arc<dyn KeyValueStore> {
    const PROBE_KEY: &str = "memberhub.probe";
    let browser = BrowserStorage;
    match browser.set(PROBE_KEY, "1").and_then(|()| browser.remove(PROBE_KEY)) {
        Ok(()) => std::sync::Arc::new(browser),
        Err(e) => {
            leptos::logging::warn!("persistent storage unavailable, using memory: {e}");
            std::sync::Arc::new(memberhub::MemoryStore::new())
        }
    }
}
