//! Error taxonomy for the session/access core.
//!
//! ERROR HANDLING
//! ==============
//! Every fallible operation resolves to one of these values; nothing in the
//! core panics across a UI event boundary. Backend messages are carried
//! verbatim so pages can render them without reinterpretation.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

/// Stable machine-readable code plus retry hint for an error value.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// AUTH
// =============================================================================

/// Errors returned by authentication operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The backend answered with a non-success status. `message` is the
    /// backend's own text (bad password, unknown email, unverified account).
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend response body did not match the expected shape.
    #[error("unexpected auth response: {0}")]
    Parse(String),

    /// The operation needs a session and none is held.
    #[error("not signed in")]
    NotAuthenticated,
}

impl AuthError {
    /// Text to show the visitor.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl ErrorCode for AuthError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Api { status: 400 | 401 | 422, .. } => "E_AUTH_CREDENTIALS",
            Self::Api { .. } => "E_AUTH_API",
            Self::Network(_) => "E_AUTH_NETWORK",
            Self::Parse(_) => "E_AUTH_PARSE",
            Self::NotAuthenticated => "E_AUTH_REQUIRED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// CONTENT
// =============================================================================

/// Errors returned by like/comment reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected content response: {0}")]
    Parse(String),

    #[error("{entity} not found")]
    NotFound { entity: String },

    /// The write matched no rows; row-level rules refused it.
    #[error("update to {entity} was rejected")]
    Rejected { entity: String },

    #[error("comment is empty")]
    EmptyComment,

    #[error("sign in to continue")]
    NotAuthenticated,
}

impl ContentError {
    /// Text for the transient notice shown after a rollback.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl ErrorCode for ContentError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Api { .. } => "E_CONTENT_API",
            Self::Network(_) => "E_CONTENT_NETWORK",
            Self::Parse(_) => "E_CONTENT_PARSE",
            Self::NotFound { .. } => "E_CONTENT_NOT_FOUND",
            Self::Rejected { .. } => "E_CONTENT_REJECTED",
            Self::EmptyComment => "E_EMPTY_COMMENT",
            Self::NotAuthenticated => "E_AUTH_REQUIRED",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Persisted-storage failures. Callers treat all of them as "forgotten".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Storage is blocked or missing (private mode, disabled cookies).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage value could not be encoded: {0}")]
    Encode(String),
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "E_STORAGE_UNAVAILABLE",
            Self::Encode(_) => "E_STORAGE_ENCODE",
        }
    }
}

// =============================================================================
// CONFIG
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing config: {var} not set")]
    Missing { var: &'static str },

    #[error("invalid config: {var}={value}")]
    Invalid { var: &'static str, value: String },
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "E_CONFIG_MISSING",
            Self::Invalid { .. } => "E_CONFIG_INVALID",
        }
    }
}
