//! Shared fakes for unit tests: backends, storage, and navigation.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::backend::{AuthBackend, AuthChange, ContentBackend, SessionEvents, SessionSubscription};
use crate::error::{AuthError, ContentError, StorageError};
use crate::navigation::{NavigationState, Navigator};
use crate::storage::KeyValueStore;
use crate::types::{AuthResponse, Comment, NewComment, Session, User};

// =============================================================================
// FIXTURES
// =============================================================================

#[must_use]
pub fn user(id: &str) -> User {
    User { id: id.to_owned(), email: Some(format!("{id}@example.com")), user_metadata: serde_json::Value::Null }
}

#[must_use]
pub fn session_for(id: &str) -> Session {
    Session {
        access_token: format!("access-{id}"),
        refresh_token: format!("refresh-{id}"),
        token_type: "bearer".into(),
        expires_at: None,
        user: user(id),
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Storage that refuses every operation, like `localStorage` in a locked-down
/// browser.
pub struct BlockedStore;

impl KeyValueStore for BlockedStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("blocked".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("blocked".into()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("blocked".into()))
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[derive(Default)]
pub struct RecordingNavigator {
    calls: Mutex<Vec<(String, Option<NavigationState>)>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<(String, Option<NavigationState>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_path(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(to, _)| to.clone())
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, to: &str, state: Option<NavigationState>) {
        self.calls.lock().unwrap().push((to.to_owned(), state));
    }
}

// =============================================================================
// AUTH BACKEND
// =============================================================================

pub const GOOD_PASSWORD: &str = "correct horse";

/// Auth backend that accepts `GOOD_PASSWORD` for any email and behaves like
/// the hosted service: successful calls announce themselves as events.
#[derive(Default)]
pub struct MockAuth {
    pub events: SessionEvents,
    session: Mutex<Option<Session>>,
    bootstrap_error: Mutex<Option<AuthError>>,
    bootstrap_gate: Option<Arc<Notify>>,
    sign_out_fails: AtomicBool,
    pub sign_out_calls: AtomicUsize,
    pub redirects: Mutex<Vec<String>>,
}

impl MockAuth {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(self, session: Session) -> Self {
        *self.session.lock().unwrap() = Some(session);
        self
    }

    #[must_use]
    pub fn failing_bootstrap(self) -> Self {
        *self.bootstrap_error.lock().unwrap() = Some(AuthError::Network("unreachable".into()));
        self
    }

    /// `get_session` waits until `gate` is notified.
    #[must_use]
    pub fn gated_bootstrap(mut self, gate: Arc<Notify>) -> Self {
        self.bootstrap_gate = Some(gate);
        self
    }

    #[must_use]
    pub fn failing_sign_out(self) -> Self {
        self.sign_out_fails.store(true, Ordering::SeqCst);
        self
    }
}

#[async_trait::async_trait]
impl AuthBackend for MockAuth {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        if let Some(gate) = &self.bootstrap_gate {
            gate.notified().await;
        }
        if let Some(err) = self.bootstrap_error.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.session.lock().unwrap().clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        if password != GOOD_PASSWORD {
            return Err(AuthError::Api { status: 400, message: "Invalid login credentials".into() });
        }
        let id = email.split('@').next().unwrap_or(email);
        let session = session_for(id);
        *self.session.lock().unwrap() = Some(session.clone());
        self.events.emit(AuthChange::SignedIn, Some(session.clone()));
        Ok(AuthResponse { user: session.user.clone(), session: Some(session) })
    }

    async fn sign_up(&self, email: &str, _password: &str, email_redirect_to: &str) -> Result<AuthResponse, AuthError> {
        self.redirects.lock().unwrap().push(email_redirect_to.to_owned());
        let id = email.split('@').next().unwrap_or(email);
        Ok(AuthResponse { user: user(id), session: None })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        if self.sign_out_fails.load(Ordering::SeqCst) {
            return Err(AuthError::Network("offline".into()));
        }
        *self.session.lock().unwrap() = None;
        self.events.emit(AuthChange::SignedOut, None);
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        if !email.contains('@') {
            return Err(AuthError::Api { status: 422, message: "Unable to validate email address".into() });
        }
        self.redirects.lock().unwrap().push(redirect_to.to_owned());
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<User, AuthError> {
        let Some(mut session) = self.session.lock().unwrap().clone() else {
            return Err(AuthError::NotAuthenticated);
        };
        if new_password.len() < 6 {
            return Err(AuthError::Api { status: 422, message: "Password should be at least 6 characters".into() });
        }
        session.user.user_metadata = serde_json::json!({ "password_changed": true });
        *self.session.lock().unwrap() = Some(session.clone());
        self.events.emit(AuthChange::UserUpdated, Some(session.clone()));
        Ok(session.user)
    }

    fn subscribe(&self) -> SessionSubscription {
        self.events.subscribe()
    }
}

// =============================================================================
// CONTENT BACKEND
// =============================================================================

/// Content backend with switchable failure and an optional gate that holds
/// every write until notified.
#[derive(Default)]
pub struct MockContent {
    likes: Mutex<HashMap<String, i64>>,
    comments: Mutex<Vec<Comment>>,
    next_id: AtomicU64,
    pub fail_writes: AtomicBool,
    /// When false, like updates succeed without echoing the stored row.
    pub silent_updates: AtomicBool,
    write_gate: Option<Arc<Notify>>,
    pub writes: AtomicUsize,
}

impl MockContent {
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: AtomicU64::new(100), ..Self::default() }
    }

    #[must_use]
    pub fn with_likes(self, video_id: &str, count: i64) -> Self {
        self.likes.lock().unwrap().insert(video_id.to_owned(), count);
        self
    }

    #[must_use]
    pub fn with_comment(self, comment: Comment) -> Self {
        self.comments.lock().unwrap().insert(0, comment);
        self
    }

    #[must_use]
    pub fn gated_writes(mut self, gate: Arc<Notify>) -> Self {
        self.write_gate = Some(gate);
        self
    }

    pub fn stored_likes(&self, video_id: &str) -> Option<i64> {
        self.likes.lock().unwrap().get(video_id).copied()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.write_gate {
            gate.notified().await;
        }
    }
}

#[async_trait::async_trait]
impl ContentBackend for MockContent {
    async fn fetch_like_count(&self, video_id: &str) -> Result<i64, ContentError> {
        self.likes
            .lock()
            .unwrap()
            .get(video_id)
            .copied()
            .ok_or_else(|| ContentError::NotFound { entity: video_id.to_owned() })
    }

    async fn update_like_count(&self, video_id: &str, count: i64) -> Result<Option<i64>, ContentError> {
        self.wait_for_gate().await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ContentError::Rejected { entity: video_id.to_owned() });
        }
        self.likes.lock().unwrap().insert(video_id.to_owned(), count);
        if self.silent_updates.load(Ordering::SeqCst) { Ok(None) } else { Ok(Some(count)) }
    }

    async fn list_comments(&self, video_id: &str) -> Result<Vec<Comment>, ContentError> {
        Ok(self.comments.lock().unwrap().iter().filter(|c| c.video_id == video_id).cloned().collect())
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, ContentError> {
        self.wait_for_gate().await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ContentError::Api { status: 500, message: "insert failed".into() });
        }
        let stored = Comment {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            video_id: comment.video_id.clone(),
            user_id: Some(comment.user_id.clone()),
            author_name: comment.author_name.clone(),
            content: comment.content.clone(),
            created_at: "2026-01-01T00:00:00Z".into(),
        };
        self.comments.lock().unwrap().insert(0, stored.clone());
        Ok(stored)
    }
}
