//! Backend DTOs shared by the session manager, the HTTP adapter, and the UI.
//!
//! DESIGN
//! ======
//! Field names follow the backend's JSON so serde round-trips stay lossless.
//! `Session` embeds its `User`; the two can only travel together.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Prefix marking a comment that has not been confirmed by the backend yet.
pub const TEMP_COMMENT_PREFIX: &str = "temp-";

/// Authenticated account as reported by the auth backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable backend identifier.
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Free-form profile fields (display name, avatar).
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

impl User {
    /// Name to show next to comments: profile `full_name`, else the email's
    /// local part, else `"Member"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self.user_metadata.get("full_name").and_then(serde_json::Value::as_str) {
            if !name.trim().is_empty() {
                return name.trim().to_owned();
            }
        }
        self.email
            .as_deref()
            .and_then(|email| email.split('@').next())
            .filter(|local| !local.is_empty())
            .map_or_else(|| "Member".to_owned(), str::to_owned)
    }
}

/// Backend-issued proof of authentication for this browser context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Expiry as Unix seconds, when the backend reports one.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl Session {
    /// Whether the session expires within `margin_secs` of `now`.
    #[must_use]
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now + margin_secs)
    }
}

/// Result of sign-in / sign-up. Sign-up yields no session while the email
/// address is still unverified.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthResponse {
    pub user: User,
    pub session: Option<Session>,
}

/// A persisted comment row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub video_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub author_name: String,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
}

impl Comment {
    /// Whether this entry is a local placeholder awaiting the backend.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.id.starts_with(TEMP_COMMENT_PREFIX)
    }
}

/// Row ids arrive as strings (uuid) or numbers (bigserial) depending on the
/// table; both become strings.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        _ => Err(D::Error::custom("expected string or number id")),
    }
}

/// Insert payload for a new comment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewComment {
    pub video_id: String,
    pub user_id: String,
    pub author_name: String,
    pub content: String,
}
