use super::*;

// =============================================================================
// AuthError
// =============================================================================

#[test]
fn auth_api_error_displays_backend_message_verbatim() {
    let err = AuthError::Api { status: 400, message: "Invalid login credentials".into() };
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert_eq!(err.message(), "Invalid login credentials");
}

#[test]
fn credential_errors_are_not_retryable() {
    for status in [400, 401, 422] {
        let err = AuthError::Api { status, message: "nope".into() };
        assert_eq!(err.error_code(), "E_AUTH_CREDENTIALS");
        assert!(!err.retryable());
    }
}

#[test]
fn auth_server_and_network_errors_are_retryable() {
    assert!(AuthError::Api { status: 503, message: "down".into() }.retryable());
    assert!(AuthError::Api { status: 429, message: "slow down".into() }.retryable());
    assert!(AuthError::Network("timeout".into()).retryable());
    assert!(!AuthError::NotAuthenticated.retryable());
}

// =============================================================================
// ContentError
// =============================================================================

#[test]
fn content_rejected_names_entity() {
    let err = ContentError::Rejected { entity: "video-7".into() };
    assert_eq!(err.to_string(), "update to video-7 was rejected");
    assert_eq!(err.error_code(), "E_CONTENT_REJECTED");
    assert!(!err.retryable());
}

#[test]
fn empty_comment_code() {
    assert_eq!(ContentError::EmptyComment.error_code(), "E_EMPTY_COMMENT");
}

// =============================================================================
// StorageError / ConfigError
// =============================================================================

#[test]
fn storage_unavailable_message() {
    let err = StorageError::Unavailable("blocked".into());
    assert_eq!(err.to_string(), "storage unavailable: blocked");
    assert_eq!(err.error_code(), "E_STORAGE_UNAVAILABLE");
}

#[test]
fn config_missing_names_variable() {
    let err = ConfigError::Missing { var: "MEMBERHUB_SUPABASE_URL" };
    assert_eq!(err.to_string(), "missing config: MEMBERHUB_SUPABASE_URL not set");
}
