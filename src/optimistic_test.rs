use std::cell::{Cell, RefCell};

use tokio::sync::oneshot;

use super::*;

// =============================================================================
// InFlightGuard
// =============================================================================

#[test]
fn second_acquire_on_same_entity_is_refused() {
    let guard = InFlightGuard::new();
    let ticket = guard.try_acquire("v1").unwrap();
    assert_eq!(ticket.entity(), "v1");
    assert!(guard.is_in_flight("v1"));
    assert!(guard.try_acquire("v1").is_none());
}

#[test]
fn different_entities_are_independent() {
    let guard = InFlightGuard::new();
    let _a = guard.try_acquire("v1").unwrap();
    assert!(guard.try_acquire("v2").is_some());
}

#[test]
fn dropping_ticket_releases_entity() {
    let guard = InFlightGuard::new();
    drop(guard.try_acquire("v1").unwrap());
    assert!(!guard.is_in_flight("v1"));
    assert!(guard.try_acquire("v1").is_some());
}

#[test]
fn clones_share_state() {
    let guard = InFlightGuard::new();
    let other = guard.clone();
    let _ticket = guard.try_acquire("v1").unwrap();
    assert!(other.is_in_flight("v1"));
}

#[test]
fn liveness_ends_for_all_clones() {
    let liveness = Liveness::new();
    let held = liveness.clone();
    assert!(held.is_alive());
    liveness.end();
    assert!(!held.is_alive());
}

// =============================================================================
// run
// =============================================================================

#[tokio::test]
async fn success_applies_then_reconciles() {
    let guard = InFlightGuard::new();
    let value = Cell::new(10);

    let outcome = Optimistic::new(&guard, "v1")
        .run(
            || value.replace(11),
            || async { Ok::<_, String>(12) },
            |canonical| value.set(canonical),
            |previous| value.set(previous),
        )
        .await;

    assert_eq!(outcome, MutationOutcome::Committed);
    assert_eq!(value.get(), 12);
    assert!(!guard.is_in_flight("v1"));
}

#[tokio::test]
async fn failure_restores_pre_mutation_value() {
    let guard = InFlightGuard::new();
    let value = Cell::new(10);
    let seen_during_write = Cell::new(0);

    let outcome = Optimistic::new(&guard, "v1")
        .run(
            || value.replace(11),
            || {
                seen_during_write.set(value.get());
                async { Err::<(), _>("refused".to_owned()) }
            },
            |()| unreachable!(),
            |previous| value.set(previous),
        )
        .await;

    assert_eq!(seen_during_write.get(), 11);
    assert_eq!(outcome.error().map(String::as_str), Some("refused"));
    assert_eq!(value.get(), 10);
    assert!(!guard.is_in_flight("v1"));
}

#[tokio::test]
async fn blocked_mutation_changes_nothing() {
    let guard = InFlightGuard::new();
    let _held = guard.try_acquire("v1").unwrap();
    let applied = Cell::new(false);

    let outcome = Optimistic::new(&guard, "v1")
        .run(|| applied.set(true), || async { Ok::<(), String>(()) }, |()| {}, |()| {})
        .await;

    assert_eq!(outcome, MutationOutcome::Blocked);
    assert!(!applied.get());
}

#[tokio::test]
async fn overlapping_mutation_is_blocked_until_first_resolves() {
    let guard = InFlightGuard::new();
    let (release, wait) = oneshot::channel::<()>();
    let log = RefCell::new(Vec::new());

    let first = Optimistic::new(&guard, "v1").run(
        || log.borrow_mut().push("apply 1"),
        move || async move {
            wait.await.ok();
            Ok::<(), String>(())
        },
        |()| log.borrow_mut().push("reconcile 1"),
        |()| {},
    );
    let second = async {
        tokio::task::yield_now().await;
        let outcome = Optimistic::new(&guard, "v1")
            .run(|| log.borrow_mut().push("apply 2"), || async { Ok::<(), String>(()) }, |()| {}, |()| {})
            .await;
        release.send(()).ok();
        outcome
    };

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first, MutationOutcome::Committed);
    assert_eq!(second, MutationOutcome::Blocked);
    assert_eq!(*log.borrow(), ["apply 1", "reconcile 1"]);
    assert!(!guard.is_in_flight("v1"));
}

#[tokio::test]
async fn ended_liveness_skips_reconcile_and_rollback() {
    let guard = InFlightGuard::new();
    let liveness = Liveness::new();
    let touched = Cell::new(false);

    let outcome = Optimistic::new(&guard, "v1")
        .while_alive(&liveness)
        .run(
            || (),
            || {
                liveness.end();
                async { Err::<(), _>("late".to_owned()) }
            },
            |()| touched.set(true),
            |()| touched.set(true),
        )
        .await;

    assert_eq!(outcome, MutationOutcome::RolledBack("late".to_owned()));
    assert!(!touched.get());
    assert!(!guard.is_in_flight("v1"));
}

#[tokio::test]
async fn dropped_future_releases_guard() {
    let guard = InFlightGuard::new();
    {
        let pending = Optimistic::new(&guard, "v1").run(
            || (),
            || std::future::pending::<Result<(), String>>(),
            |()| {},
            |()| {},
        );
        let mut pending = std::pin::pin!(pending);
        let waker = std::task::Waker::noop();
        let mut cx = std::task::Context::from_waker(waker);
        assert!(pending.as_mut().poll(&mut cx).is_pending());
        assert!(guard.is_in_flight("v1"));
    }
    assert!(!guard.is_in_flight("v1"));
}
