//! Hosted auth (GoTrue) + row API (PostgREST) adapter over `reqwest`.
//!
//! DESIGN
//! ======
//! The adapter owns the authoritative copy of the backend session: it keeps
//! it in memory, mirrors it into the injected `KeyValueStore` so a reload can
//! restore it, and announces every change through `SessionEvents`. Content
//! requests reuse the current access token so row-level rules see the
//! visitor.
//!
//! TRADE-OFFS
//! ==========
//! Sign-out clears the local session even when the logout request fails. A
//! stale server-side session is harmless: its next use fails cleanly.

#[cfg(test)]
#[path = "supabase_test.rs"]
mod supabase_test;

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::Url;
use serde::Deserialize;

use super::{AuthBackend, AuthChange, ContentBackend, SessionEvents, SessionSubscription};
use crate::clock::now_unix;
use crate::config::BackendConfig;
use crate::error::{AuthError, ContentError};
use crate::storage::{self, KeyValueStore};
use crate::types::{AuthResponse, Comment, NewComment, Session, User};

/// Storage key of the persisted session.
pub const SESSION_KEY: &str = "memberhub.auth.session";

/// Sessions closer than this to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 60;

// =============================================================================
// WIRE SHAPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: i64) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_owned()),
            expires_at: self.expires_at.or_else(|| self.expires_in.map(|secs| now + secs)),
            user: self.user,
        }
    }
}

/// Tokens carried in the fragment of an email link.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FragmentTokens {
    access_token: String,
    refresh_token: String,
    expires_in: Option<i64>,
    link_type: Option<String>,
}

enum HttpFailure {
    Network(String),
    Status { status: u16, message: String },
}

impl From<HttpFailure> for AuthError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Network(e) => Self::Network(e),
            HttpFailure::Status { status, message } => Self::Api { status, message },
        }
    }
}

impl From<HttpFailure> for ContentError {
    fn from(failure: HttpFailure) -> Self {
        match failure {
            HttpFailure::Network(e) => Self::Network(e),
            HttpFailure::Status { status, message } => Self::Api { status, message },
        }
    }
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Pull a human-readable message out of an error body.
fn error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(text) = value.get(key).and_then(serde_json::Value::as_str) {
                if !text.trim().is_empty() {
                    return text.trim().to_owned();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('{') {
        format!("request failed: {status}")
    } else {
        trimmed.to_owned()
    }
}

/// Interpret a sign-up body. With email confirmation on, the backend returns
/// the bare user (or `{ "user": ... }`) and no tokens.
fn parse_sign_up(body: &str, now: i64) -> Result<AuthResponse, AuthError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| AuthError::Parse(e.to_string()))?;
    if value.get("access_token").is_some() {
        let token: TokenResponse = serde_json::from_value(value).map_err(|e| AuthError::Parse(e.to_string()))?;
        let session = token.into_session(now);
        return Ok(AuthResponse { user: session.user.clone(), session: Some(session) });
    }
    let user_value = value.get("user").cloned().unwrap_or(value);
    let user: User = serde_json::from_value(user_value).map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(AuthResponse { user, session: None })
}

fn parse_session(body: &str, now: i64) -> Result<Session, AuthError> {
    let token: TokenResponse = serde_json::from_str(body).map_err(|e| AuthError::Parse(e.to_string()))?;
    Ok(token.into_session(now))
}

/// Parse `access_token=..&refresh_token=..&expires_in=..&type=..`, with or
/// without the leading `#`.
fn parse_fragment(fragment: &str) -> Option<FragmentTokens> {
    let raw = fragment.trim_start_matches('#');
    let url = Url::parse(&format!("http://fragment.invalid/?{raw}")).ok()?;
    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    let mut link_type = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "access_token" => access_token = Some(value.into_owned()),
            "refresh_token" => refresh_token = Some(value.into_owned()),
            "expires_in" => expires_in = value.parse::<i64>().ok(),
            "type" => link_type = Some(value.into_owned()),
            _ => {}
        }
    }
    Some(FragmentTokens {
        access_token: access_token.filter(|t| !t.is_empty())?,
        refresh_token: refresh_token.unwrap_or_default(),
        expires_in,
        link_type,
    })
}

fn first_row(body: &str) -> Result<Option<serde_json::Value>, ContentError> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(body).map_err(|e| ContentError::Parse(e.to_string()))?;
    Ok(rows.into_iter().next())
}

fn count_from_row(row: &serde_json::Value, column: &str) -> Result<i64, ContentError> {
    match row.get(column) {
        Some(serde_json::Value::Null) | None => Ok(0),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| ContentError::Parse(format!("column {column} is not an integer"))),
    }
}

async fn send(request: reqwest::RequestBuilder) -> Result<String, HttpFailure> {
    let response = request.send().await.map_err(|e| HttpFailure::Network(e.to_string()))?;
    let status = response.status();
    let body = response.text().await.map_err(|e| HttpFailure::Network(e.to_string()))?;
    if !status.is_success() {
        return Err(HttpFailure::Status { status: status.as_u16(), message: error_message(status.as_u16(), &body) });
    }
    Ok(body)
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct SupabaseClient {
    http: reqwest::Client,
    config: BackendConfig,
    store: Arc<dyn KeyValueStore>,
    session: Mutex<Option<Session>>,
    events: SessionEvents,
}

impl SupabaseClient {
    /// Build the adapter and restore any session persisted by a previous
    /// page load.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Network`] if the HTTP client cannot be built.
    pub fn new(config: BackendConfig, store: Arc<dyn KeyValueStore>) -> Result<Self, AuthError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.request_timeout);
        let http = builder.build().map_err(|e| AuthError::Network(e.to_string()))?;

        let restored = storage::load_json::<Session>(store.as_ref(), SESSION_KEY);
        if let Some(session) = &restored {
            tracing::debug!(user_id = %session.user.id, "restored persisted session");
        }

        Ok(Self { http, config, store, session: Mutex::new(restored), events: SessionEvents::new() })
    }

    /// Event hub, exposed for diagnostics.
    #[must_use]
    pub fn events(&self) -> &SessionEvents {
        &self.events
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.url)
    }

    fn rest_url(&self, table: &str, params: &[(&str, String)]) -> Result<Url, ContentError> {
        let base = format!("{}/rest/v1/{table}", self.config.url);
        let url = if params.is_empty() { Url::parse(&base) } else { Url::parse_with_params(&base, params) };
        url.map_err(|e| ContentError::Parse(e.to_string()))
    }

    fn current_session(&self) -> Option<Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn access_token(&self) -> Option<String> {
        self.current_session().map(|s| s.access_token)
    }

    fn bearer(&self) -> String {
        self.access_token().unwrap_or_else(|| self.config.anon_key.clone())
    }

    /// Replace the held session in memory and in storage.
    fn store_session(&self, session: Option<&Session>) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = session.cloned();
        let persisted = match session {
            Some(session) => storage::save_json(self.store.as_ref(), SESSION_KEY, session),
            None => self.store.remove(SESSION_KEY),
        };
        if let Err(e) = persisted {
            tracing::warn!(error = %e, "session not persisted; it will not survive a reload");
        }
    }

    fn request(&self, method: reqwest::Method, url: impl reqwest::IntoUrl) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.anon_key)
            .bearer_auth(self.bearer())
    }

    /// Exchange the held refresh token for a new session.
    ///
    /// A rejected refresh token clears the session and emits `SignedOut`;
    /// network failures leave it in place for a later retry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotAuthenticated`] when no session is held, or the
    /// backend/network error.
    pub async fn refresh_session(&self) -> Result<Session, AuthError> {
        let Some(current) = self.current_session() else {
            return Err(AuthError::NotAuthenticated);
        };
        let request = self
            .http
            .post(self.auth_url("token?grant_type=refresh_token"))
            .header("apikey", &self.config.anon_key)
            .json(&serde_json::json!({ "refresh_token": current.refresh_token }));

        match send(request).await {
            Ok(body) => {
                let session = parse_session(&body, now_unix())?;
                self.store_session(Some(&session));
                tracing::info!(user_id = %session.user.id, "session refreshed");
                self.events.emit(AuthChange::TokenRefreshed, Some(session.clone()));
                Ok(session)
            }
            Err(HttpFailure::Status { status, message }) => {
                tracing::warn!(status, %message, "refresh token rejected; clearing session");
                self.store_session(None);
                self.events.emit(AuthChange::SignedOut, None);
                Err(AuthError::Api { status, message })
            }
            Err(failure) => Err(failure.into()),
        }
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User, AuthError> {
        let request = self
            .http
            .get(self.auth_url("user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token);
        let body = send(request).await?;
        serde_json::from_str(&body).map_err(|e| AuthError::Parse(e.to_string()))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl AuthBackend for SupabaseClient {
    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        let Some(session) = self.current_session() else {
            return Ok(None);
        };
        if !session.expires_within(now_unix(), REFRESH_MARGIN_SECS) {
            return Ok(Some(session));
        }
        match self.refresh_session().await {
            Ok(session) => Ok(Some(session)),
            Err(AuthError::Api { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let request = self
            .http
            .post(self.auth_url("token?grant_type=password"))
            .header("apikey", &self.config.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }));
        let body = send(request).await?;
        let session = parse_session(&body, now_unix())?;

        self.store_session(Some(&session));
        tracing::info!(user_id = %session.user.id, "signed in");
        self.events.emit(AuthChange::SignedIn, Some(session.clone()));
        Ok(AuthResponse { user: session.user.clone(), session: Some(session) })
    }

    async fn sign_up(&self, email: &str, password: &str, email_redirect_to: &str) -> Result<AuthResponse, AuthError> {
        let url = Url::parse_with_params(&self.auth_url("signup"), &[("redirect_to", email_redirect_to)])
            .map_err(|e| AuthError::Parse(e.to_string()))?;
        let request = self
            .http
            .post(url)
            .header("apikey", &self.config.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }));
        let body = send(request).await?;
        let response = parse_sign_up(&body, now_unix())?;

        if let Some(session) = &response.session {
            self.store_session(Some(session));
            self.events.emit(AuthChange::SignedIn, Some(session.clone()));
        } else {
            tracing::info!(user_id = %response.user.id, "sign-up pending email verification");
        }
        Ok(response)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let result = match self.access_token() {
            Some(token) => {
                let request = self
                    .http
                    .post(self.auth_url("logout"))
                    .header("apikey", &self.config.anon_key)
                    .bearer_auth(token);
                send(request).await.map(|_| ()).map_err(AuthError::from)
            }
            None => Ok(()),
        };
        self.store_session(None);
        self.events.emit(AuthChange::SignedOut, None);
        result
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        let url = Url::parse_with_params(&self.auth_url("recover"), &[("redirect_to", redirect_to)])
            .map_err(|e| AuthError::Parse(e.to_string()))?;
        let request = self
            .http
            .post(url)
            .header("apikey", &self.config.anon_key)
            .json(&serde_json::json!({ "email": email }));
        send(request).await?;
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<User, AuthError> {
        let Some(mut session) = self.current_session() else {
            return Err(AuthError::NotAuthenticated);
        };
        let request = self
            .request(reqwest::Method::PUT, self.auth_url("user"))
            .json(&serde_json::json!({ "password": new_password }));
        let body = send(request).await?;
        let user: User = serde_json::from_str(&body).map_err(|e| AuthError::Parse(e.to_string()))?;

        session.user = user.clone();
        self.store_session(Some(&session));
        self.events.emit(AuthChange::UserUpdated, Some(session));
        Ok(user)
    }

    async fn session_from_url(&self, fragment: &str) -> Result<Option<Session>, AuthError> {
        let Some(tokens) = parse_fragment(fragment) else {
            return Ok(None);
        };
        let user = self.fetch_user(&tokens.access_token).await?;
        let now = now_unix();
        let session = Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            token_type: "bearer".to_owned(),
            expires_at: tokens.expires_in.map(|secs| now + secs),
            user,
        };
        self.store_session(Some(&session));
        let change = match tokens.link_type.as_deref() {
            Some("recovery") => AuthChange::PasswordRecovery,
            _ => AuthChange::SignedIn,
        };
        tracing::info!(user_id = %session.user.id, ?change, "session adopted from email link");
        self.events.emit(change, Some(session.clone()));
        Ok(Some(session))
    }

    fn subscribe(&self) -> SessionSubscription {
        self.events.subscribe()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl ContentBackend for SupabaseClient {
    async fn fetch_like_count(&self, video_id: &str) -> Result<i64, ContentError> {
        let url = self.rest_url(
            &self.config.videos_table,
            &[("id", format!("eq.{video_id}")), ("select", self.config.likes_column.clone())],
        )?;
        let body = send(self.request(reqwest::Method::GET, url)).await?;
        let row = first_row(&body)?.ok_or_else(|| ContentError::NotFound { entity: video_id.to_owned() })?;
        count_from_row(&row, &self.config.likes_column)
    }

    async fn update_like_count(&self, video_id: &str, count: i64) -> Result<Option<i64>, ContentError> {
        let url = self.rest_url(&self.config.videos_table, &[("id", format!("eq.{video_id}"))])?;
        let mut payload = serde_json::Map::new();
        payload.insert(self.config.likes_column.clone(), serde_json::Value::from(count));
        let request = self
            .request(reqwest::Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&payload);
        let body = send(request).await?;
        let row = first_row(&body)?.ok_or_else(|| ContentError::Rejected { entity: video_id.to_owned() })?;
        count_from_row(&row, &self.config.likes_column).map(Some)
    }

    async fn list_comments(&self, video_id: &str) -> Result<Vec<Comment>, ContentError> {
        let url = self.rest_url(
            &self.config.comments_table,
            &[
                ("video_id", format!("eq.{video_id}")),
                ("select", "*".to_owned()),
                ("order", "created_at.desc".to_owned()),
            ],
        )?;
        let body = send(self.request(reqwest::Method::GET, url)).await?;
        serde_json::from_str(&body).map_err(|e| ContentError::Parse(e.to_string()))
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment, ContentError> {
        if self.access_token().is_none() {
            return Err(ContentError::NotAuthenticated);
        }
        let url = self.rest_url(&self.config.comments_table, &[])?;
        let request = self
            .request(reqwest::Method::POST, url)
            .header("Prefer", "return=representation")
            .json(comment);
        let body = send(request).await?;
        let row = first_row(&body)?.ok_or_else(|| ContentError::Rejected { entity: comment.video_id.clone() })?;
        serde_json::from_value(row).map_err(|e| ContentError::Parse(e.to_string()))
    }
}
