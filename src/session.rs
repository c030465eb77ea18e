//! Session manager: the one owner of "who is signed in".
//!
//! SYSTEM CONTEXT
//! ==============
//! The application shell creates one `SessionManager`, shares it by `Arc`,
//! and mounts it once. Every other component reads `AuthState` through a
//! `watch::Receiver` and changes it only by calling manager operations.
//!
//! LIFECYCLE
//! =========
//! `mount()` subscribes to backend session changes first, then bootstraps.
//! Events that arrive while the bootstrap read is in flight stay buffered in
//! the subscription and are applied after it, so the newest event always
//! wins. `loading` goes true → false once, when bootstrap finishes, and
//! never returns. Dropping the returned `ShellGuard` ends the pump and
//! releases the subscription.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{oneshot, watch};

use crate::backend::{AuthBackend, SessionEvent, SessionSubscription};
use crate::config::SiteRoutes;
use crate::error::{AuthError, ErrorCode};
use crate::navigation::Navigator;
use crate::types::{AuthResponse, Session, User};

// =============================================================================
// AUTH STATE
// =============================================================================

/// Snapshot of the authentication state.
///
/// The user is read from the session, so the two are always present or
/// absent together. While `is_loading()` is true the session is not
/// authoritative.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    session: Option<Session>,
    loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { session: None, loading: true }
    }
}

impl AuthState {
    /// Settled state with the given session.
    #[must_use]
    pub fn settled(session: Option<Session>) -> Self {
        Self { session, loading: false }
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Settled and signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.session.is_some()
    }
}

// =============================================================================
// SHELL GUARD
// =============================================================================

/// Scoped ownership of the session subscription. Releasing or dropping it
/// stops the pump returned by [`SessionManager::mount`].
#[derive(Debug)]
pub struct ShellGuard {
    shutdown: oneshot::Sender<()>,
}

impl ShellGuard {
    pub fn release(self) {
        let _ = self.shutdown.send(());
    }
}

// =============================================================================
// SESSION MANAGER
// =============================================================================

pub struct SessionManager {
    backend: Arc<dyn AuthBackend>,
    navigator: Arc<dyn Navigator>,
    routes: SiteRoutes,
    site_url: String,
    state: watch::Sender<AuthState>,
    bootstrapped: AtomicBool,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        navigator: Arc<dyn Navigator>,
        routes: SiteRoutes,
        site_url: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { backend, navigator, routes, site_url: site_url.into(), state, bootstrapped: AtomicBool::new(false) }
    }

    /// Read-only handle that observes every state change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn routes(&self) -> &SiteRoutes {
        &self.routes
    }

    /// Wait until bootstrap has settled and return that state.
    pub async fn ready(&self) -> AuthState {
        let mut rx = self.watch();
        match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// Subscribe to backend session changes and return the guard plus the
    /// pump future. The caller spawns the future on its executor.
    pub fn mount(self: &Arc<Self>) -> (ShellGuard, impl Future<Output = ()> + use<>) {
        let subscription = self.backend.subscribe();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let manager = Arc::clone(self);
        let pump = async move { manager.run(subscription, shutdown_rx).await };
        (ShellGuard { shutdown: shutdown_tx }, pump)
    }

    async fn run(&self, mut subscription: SessionSubscription, mut shutdown: oneshot::Receiver<()>) {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::debug!("shell unmounted during bootstrap");
                return;
            }
            () = self.bootstrap() => {}
        }

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                event = subscription.next() => match event {
                    Some(event) => self.apply_event(event),
                    None => {
                        tracing::warn!("session subscription closed by backend; treating visitor as signed out");
                        self.state.send_modify(|state| state.session = None);
                        break;
                    }
                },
            }
        }
        tracing::debug!("session subscription released");
    }

    /// Fetch the current session once and settle `loading`. Later calls are
    /// no-ops. Backend failures settle as signed out.
    pub async fn bootstrap(&self) {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return;
        }
        let session = match self.backend.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, code = e.error_code(), "session bootstrap failed; continuing signed out");
                None
            }
        };
        tracing::info!(signed_in = session.is_some(), "session bootstrapped");
        self.state.send_modify(|state| {
            state.session = session;
            state.loading = false;
        });
    }

    /// Replace session and user from a backend notification.
    pub fn apply_event(&self, event: SessionEvent) {
        tracing::debug!(change = ?event.change, signed_in = event.session.is_some(), "session change");
        self.state.send_modify(|state| state.session = event.session);
    }

    /// Verify credentials. The new session arrives through the subscription,
    /// not synchronously with the return.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`AuthError`] unmodified.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let result = self.backend.sign_in_with_password(email, password).await;
        match &result {
            Ok(_) => tracing::info!(%email, "sign in succeeded"),
            Err(e) => tracing::info!(%email, code = e.error_code(), "sign in refused"),
        }
        result
    }

    /// Create an account whose verification link returns to the sign-in page.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`AuthError`] unmodified.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let callback = self.routes.email_callback_url(&self.site_url);
        let result = self.backend.sign_up(email, password, &callback).await;
        match &result {
            Ok(response) => {
                tracing::info!(%email, verified = response.session.is_some(), "sign up accepted");
            }
            Err(e) => tracing::info!(%email, code = e.error_code(), "sign up refused"),
        }
        result
    }

    /// End the session and go to the landing page. Never fails: a backend
    /// error still clears the local session and navigates.
    pub async fn sign_out(&self) {
        if let Err(e) = self.backend.sign_out().await {
            tracing::warn!(error = %e, "backend sign-out failed; clearing local session anyway");
        }
        self.state.send_modify(|state| state.session = None);
        self.navigator.navigate(&self.routes.home_path, None);
    }

    /// Send a password-reset email linking back to the reset page.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`AuthError`] unmodified.
    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let callback = self.routes.reset_callback_url(&self.site_url);
        self.backend.reset_password_for_email(email, &callback).await
    }

    /// # Errors
    ///
    /// Returns the backend's [`AuthError`] unmodified.
    pub async fn update_password(&self, new_password: &str) -> Result<User, AuthError> {
        self.backend.update_password(new_password).await
    }

    /// Adopt the session carried by an email-verification or reset link.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`AuthError`] unmodified.
    pub async fn complete_email_link(&self, fragment: &str) -> Result<Option<Session>, AuthError> {
        self.backend.session_from_url(fragment).await
    }
}
