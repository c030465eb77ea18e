//! Persisted "return here after signing in" record.
//!
//! At most one record exists; every write replaces the previous one. Storage
//! failures degrade to "forgotten" because the in-memory navigation state
//! carries the same path.

#[cfg(test)]
#[path = "redirect_test.rs"]
mod redirect_test;

use std::sync::Arc;

use crate::storage::KeyValueStore;

/// Fixed storage key of the redirect record.
pub const REDIRECT_KEY: &str = "memberhub.redirect_after_login";

#[derive(Clone)]
pub struct RedirectStore {
    store: Arc<dyn KeyValueStore>,
}

impl RedirectStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Record `path` as the pending destination, replacing any earlier one.
    pub fn remember(&self, path: &str) {
        if let Err(e) = self.store.set(REDIRECT_KEY, path) {
            tracing::warn!(%path, error = %e, "redirect target not persisted");
        }
    }

    /// Current record without clearing it.
    #[must_use]
    pub fn peek(&self) -> Option<String> {
        match self.store.get(REDIRECT_KEY) {
            Ok(path) => path.filter(|p| !p.is_empty()),
            Err(e) => {
                tracing::debug!(error = %e, "redirect target unreadable");
                None
            }
        }
    }

    /// Read and clear the record.
    #[must_use]
    pub fn take(&self) -> Option<String> {
        let path = self.peek();
        self.clear();
        path
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(REDIRECT_KEY) {
            tracing::debug!(error = %e, "redirect target not cleared");
        }
    }
}
