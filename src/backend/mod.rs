//! Backend seams: authentication and content persistence.
//!
//! ARCHITECTURE
//! ============
//! `AuthBackend` and `ContentBackend` are the only way the core talks to the
//! network. `supabase` is the production adapter; tests substitute mocks.
//! Session-change notifications travel over a `tokio::sync::broadcast`
//! channel so they reach subscribers in emission order.

pub mod supabase;


use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::error::{AuthError, ContentError};
use crate::types::{AuthResponse, Comment, NewComment, Session, User};

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 32;

// =============================================================================
// SESSION EVENTS
// =============================================================================

/// What happened to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthChange {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    /// Visitor arrived from a password-reset email link.
    PasswordRecovery,
}

/// A session-change notification. `session` is the full new state: `None`
/// means signed out.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionEvent {
    pub change: AuthChange,
    pub session: Option<Session>,
}

/// Fan-out point for session events. Backends own one and hand out
/// subscriptions.
#[derive(Clone, Debug)]
pub struct SessionEvents {
    tx: broadcast::Sender<SessionEvent>,
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEvents {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    /// Deliver an event to every live subscription. No subscribers is fine.
    pub fn emit(&self, change: AuthChange, session: Option<Session>) {
        let delivered = self.tx.send(SessionEvent { change, session }).unwrap_or(0);
        tracing::debug!(?change, delivered, "session event emitted");
    }

    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription { rx: self.tx.subscribe() }
    }

    /// Live subscriptions. Drops to zero once every holder released theirs.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A registered listener. Dropping it unsubscribes.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: broadcast::Receiver<SessionEvent>,
}

impl SessionSubscription {
    /// Next event, or `None` once the backend is gone.
    ///
    /// A lagging subscriber skips the overwritten events and resumes with the
    /// oldest one still buffered; order is preserved.
    pub async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session subscription lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// Authentication service. Errors carry the backend's message verbatim.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait AuthBackend: Send + Sync {
    /// Session for this browser context, if any.
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError>;

    /// Create an account. `email_redirect_to` is where the verification link
    /// should land.
    async fn sign_up(&self, email: &str, password: &str, email_redirect_to: &str) -> Result<AuthResponse, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), AuthError>;

    async fn update_password(&self, new_password: &str) -> Result<User, AuthError>;

    /// Adopt the session carried by an email-link URL fragment
    /// (`#access_token=...&type=recovery`). `Ok(None)` when the fragment
    /// carries no tokens.
    async fn session_from_url(&self, fragment: &str) -> Result<Option<Session>, AuthError> {
        let _ = fragment;
        Ok(None)
    }

    /// Register for session-change notifications.
    fn subscribe(&self) -> SessionSubscription;
}

/// Row-level reads and writes for likes and comments.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait ContentBackend: Send + Sync {
    async fn fetch_like_count(&self, video_id: &str) -> Result<i64, ContentError>;

    /// Write the new count. Returns the stored count when the backend echoes
    /// the row.
    async fn update_like_count(&self, video_id: &str, count: i64) -> Result<Option<i64>, ContentError>;

    /// Comments for a video, newest first.
    async fn list_comments(&self, video_id: &str) -> Result<Vec<Comment>, ContentError>;

    /// Insert and return the persisted row (server-assigned id and timestamp).
    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, ContentError>;
}
