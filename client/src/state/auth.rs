//! Reactive mirror of the session manager's state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionManager` publishes `AuthState` on a `watch` channel. The app shell
//! copies every published value into one `RwSignal<AuthState>` so views can
//! read it reactively. Components never write the signal themselves.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use memberhub::AuthState;
use tokio::sync::watch;

/// Label for the header's account link.
pub fn account_label(state: &AuthState) -> Option<String> {
    if state.is_loading() {
        return None;
    }
    state.user().map(memberhub::User::display_name)
}

/// Whether the header should offer "Sign in".
pub fn offers_sign_in(state: &AuthState) -> bool {
    !state.is_loading() && state.user().is_none()
}

/// Push every state the manager publishes into `sink` until the manager is
/// dropped.
pub async fn mirror<F>(mut rx: watch::Receiver<AuthState>, mut sink: F)
where
    F: FnMut(AuthState),
{
    sink(rx.borrow_and_update().clone());
    while rx.changed().await.is_ok() {
        sink(rx.borrow_and_update().clone());
    }
}
