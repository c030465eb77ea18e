//! Optimistic mutation: apply locally, write remotely, reconcile or roll back.
//!
//! DESIGN
//! ======
//! Every call site supplies four closures to [`Optimistic::run`]:
//!
//! - `apply`: change local state right away and return what is needed to
//!   undo it.
//! - `remote_write`: issue the backend write.
//! - `reconcile`: adopt the canonical value the backend returned.
//! - `rollback`: restore the exact pre-mutation state from the undo value.
//!
//! A per-entity [`InFlightGuard`] blocks a second mutation on the same entity
//! until the first resolves. The guard is released by dropping the
//! [`InFlightTicket`], so every exit path (success, rollback, a dropped
//! future, a panic) re-enables the control.
//!
//! A [`Liveness`] token covers the widget going away while the write is
//! outstanding: the write is not cancelled, but its result is not applied.

#[cfg(test)]
#[path = "optimistic_test.rs"]
mod optimistic_test;

use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

// =============================================================================
// IN-FLIGHT GUARD
// =============================================================================

/// Set of entity keys with a mutation outstanding.
#[derive(Clone, Debug, Default)]
pub struct InFlightGuard {
    active: Arc<Mutex<HashSet<String>>>,
}

impl InFlightGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `entity` busy. `None` when a mutation on it is already running.
    #[must_use]
    pub fn try_acquire(&self, entity: &str) -> Option<InFlightTicket> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if !active.insert(entity.to_owned()) {
            return None;
        }
        Some(InFlightTicket { active: Arc::clone(&self.active), entity: entity.to_owned() })
    }

    #[must_use]
    pub fn is_in_flight(&self, entity: &str) -> bool {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).contains(entity)
    }
}

/// Proof that an entity is busy. Dropping it releases the entity.
#[derive(Debug)]
pub struct InFlightTicket {
    active: Arc<Mutex<HashSet<String>>>,
    entity: String,
}

impl InFlightTicket {
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }
}

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.active.lock().unwrap_or_else(PoisonError::into_inner).remove(&self.entity);
    }
}

// =============================================================================
// LIVENESS
// =============================================================================

/// Cleared when the owning widget unmounts.
#[derive(Clone, Debug)]
pub struct Liveness(Arc<AtomicBool>);

impl Default for Liveness {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Liveness {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn end(&self) {
        self.0.store(false, Ordering::Release);
    }
}

// =============================================================================
// RUN
// =============================================================================

/// How one optimistic mutation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<E> {
    /// Remote write succeeded.
    Committed,
    /// Remote write failed; local state was restored.
    RolledBack(E),
    /// Another mutation on the same entity was outstanding. Nothing changed.
    Blocked,
}

impl<E> MutationOutcome<E> {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }

    #[must_use]
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::RolledBack(e) => Some(e),
            _ => None,
        }
    }
}

/// One optimistic mutation against one entity.
pub struct Optimistic<'a> {
    guard: &'a InFlightGuard,
    entity: &'a str,
    liveness: Option<&'a Liveness>,
}

impl<'a> Optimistic<'a> {
    #[must_use]
    pub fn new(guard: &'a InFlightGuard, entity: &'a str) -> Self {
        Self { guard, entity, liveness: None }
    }

    /// Skip reconcile and rollback when `liveness` has ended by the time the
    /// write resolves.
    #[must_use]
    pub fn while_alive(mut self, liveness: &'a Liveness) -> Self {
        self.liveness = Some(liveness);
        self
    }

    fn alive(&self) -> bool {
        self.liveness.is_none_or(Liveness::is_alive)
    }

    pub async fn run<U, T, E, Apply, Write, Fut, Reconcile, Rollback>(
        self,
        apply: Apply,
        remote_write: Write,
        reconcile: Reconcile,
        rollback: Rollback,
    ) -> MutationOutcome<E>
    where
        Apply: FnOnce() -> U,
        Write: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        Reconcile: FnOnce(T),
        Rollback: FnOnce(U),
        E: Display,
    {
        let Some(_ticket) = self.guard.try_acquire(self.entity) else {
            tracing::debug!(entity = %self.entity, "mutation blocked; another is in flight");
            return MutationOutcome::Blocked;
        };

        let undo = apply();
        let result = remote_write().await;

        if !self.alive() {
            tracing::debug!(entity = %self.entity, ok = result.is_ok(), "owner gone; discarding write result");
            return match result {
                Ok(_) => MutationOutcome::Committed,
                Err(e) => MutationOutcome::RolledBack(e),
            };
        }

        match result {
            Ok(value) => {
                reconcile(value);
                MutationOutcome::Committed
            }
            Err(e) => {
                tracing::warn!(entity = %self.entity, error = %e, "remote write failed; rolling back");
                rollback(undo);
                MutationOutcome::RolledBack(e)
            }
        }
    }
}
