//! Like toggle for one video.
//!
//! The "liked" flag lives only in local storage; the count lives in the
//! backend row. A toggle flips both locally, persists the flag, then writes
//! the new count. A refused write restores the previous count and flag.

#[cfg(test)]
#[path = "like_test.rs"]
mod like_test;

use std::sync::{Arc, Mutex, PoisonError};

use crate::backend::ContentBackend;
use crate::error::ContentError;
use crate::optimistic::{InFlightGuard, Liveness, MutationOutcome, Optimistic};
use crate::storage::{self, KeyValueStore};

use super::Observer;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeState {
    pub count: i64,
    pub liked: bool,
}

impl LikeState {
    /// State after one toggle. The count never drops below zero.
    #[must_use]
    pub fn toggled(self) -> Self {
        if self.liked {
            Self { count: (self.count - 1).max(0), liked: false }
        } else {
            Self { count: self.count + 1, liked: true }
        }
    }
}

pub struct LikeToggle {
    video_id: String,
    flag_key: String,
    backend: Arc<dyn ContentBackend>,
    store: Arc<dyn KeyValueStore>,
    guard: InFlightGuard,
    liveness: Liveness,
    state: Mutex<LikeState>,
    observer: Option<Observer<LikeState>>,
}

impl LikeToggle {
    /// Controller for `video_id`. The liked flag is read from storage right
    /// away; the count stays zero until [`LikeToggle::load`].
    #[must_use]
    pub fn new(
        video_id: &str,
        backend: Arc<dyn ContentBackend>,
        store: Arc<dyn KeyValueStore>,
        guard: InFlightGuard,
    ) -> Self {
        let flag_key = storage::liked_key(video_id);
        let liked = storage::read_flag(store.as_ref(), &flag_key);
        Self {
            video_id: video_id.to_owned(),
            flag_key,
            backend,
            store,
            guard,
            liveness: Liveness::new(),
            state: Mutex::new(LikeState { count: 0, liked }),
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Observer<LikeState>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[must_use]
    pub fn state(&self) -> LikeState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// True while a toggle is outstanding; the control should be disabled.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.guard.is_in_flight(&self.guard_key())
    }

    /// The widget is going away; pending writes must not touch its state.
    pub fn unmount(&self) {
        self.liveness.end();
    }

    /// Fetch the count from the backend and the flag from storage.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`ContentError`]; the displayed state is left
    /// unchanged.
    pub async fn load(&self) -> Result<LikeState, ContentError> {
        let count = self.backend.fetch_like_count(&self.video_id).await?;
        let liked = storage::read_flag(self.store.as_ref(), &self.flag_key);
        let loaded = LikeState { count, liked };
        if self.liveness.is_alive() {
            self.set(loaded);
        }
        Ok(loaded)
    }

    /// Flip the like.
    ///
    /// On a refused write the stored flag goes back to its pre-toggle value
    /// even if the widget has unmounted meanwhile; only the displayed state
    /// is tied to liveness.
    pub async fn toggle(&self) -> MutationOutcome<ContentError> {
        let key = self.guard_key();
        let liked_before = self.state().liked;
        let outcome = Optimistic::new(&self.guard, &key)
            .while_alive(&self.liveness)
            .run(
                || {
                    let previous = self.state();
                    let next = previous.toggled();
                    storage::write_flag(self.store.as_ref(), &self.flag_key, next.liked);
                    self.set(next);
                    previous
                },
                || self.backend.update_like_count(&self.video_id, self.state().count),
                |stored| {
                    if let Some(count) = stored {
                        let liked = self.state().liked;
                        self.set(LikeState { count, liked });
                    }
                },
                |previous: LikeState| self.set(previous),
            )
            .await;
        match &outcome {
            MutationOutcome::Committed => {
                tracing::debug!(video_id = %self.video_id, state = ?self.state(), "like saved");
            }
            MutationOutcome::RolledBack(_) => {
                storage::write_flag(self.store.as_ref(), &self.flag_key, liked_before);
            }
            MutationOutcome::Blocked => {}
        }
        outcome
    }

    fn guard_key(&self) -> String {
        format!("like:{}", self.video_id)
    }

    fn set(&self, next: LikeState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        if let Some(observer) = &self.observer {
            observer(&next);
        }
    }
}
