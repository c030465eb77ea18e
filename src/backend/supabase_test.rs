use std::time::Duration;

use super::*;
use crate::storage::MemoryStore;
use crate::test_helpers::session_for;

fn config() -> BackendConfig {
    BackendConfig {
        url: "https://proj.supabase.co".into(),
        anon_key: "anon-key".into(),
        site_url: "http://localhost:8080".into(),
        request_timeout: Duration::from_secs(5),
        videos_table: "videos".into(),
        likes_column: "likes".into(),
        comments_table: "comments".into(),
    }
}

fn client_with(store: Arc<MemoryStore>) -> SupabaseClient {
    SupabaseClient::new(config(), store).unwrap()
}

// =============================================================================
// error_message
// =============================================================================

#[test]
fn error_message_prefers_error_description() {
    let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
    assert_eq!(error_message(400, body), "Invalid login credentials");
}

#[test]
fn error_message_reads_msg_then_message() {
    assert_eq!(error_message(422, r#"{"code":422,"msg":"Password should be at least 6 characters"}"#), "Password should be at least 6 characters");
    assert_eq!(error_message(403, r#"{"message":"permission denied"}"#), "permission denied");
}

#[test]
fn error_message_falls_back_to_plain_body_or_status() {
    assert_eq!(error_message(502, "Bad Gateway"), "Bad Gateway");
    assert_eq!(error_message(500, ""), "request failed: 500");
    assert_eq!(error_message(500, r#"{"unexpected":true}"#), "request failed: 500");
}

// =============================================================================
// parse_session / parse_sign_up
// =============================================================================

const TOKEN_BODY: &str = r#"{
    "access_token": "at",
    "refresh_token": "rt",
    "token_type": "bearer",
    "expires_in": 3600,
    "user": {"id": "u1", "email": "ada@example.com"}
}"#;

#[test]
fn parse_session_derives_expiry_from_expires_in() {
    let session = parse_session(TOKEN_BODY, 1_000).unwrap();
    assert_eq!(session.access_token, "at");
    assert_eq!(session.refresh_token, "rt");
    assert_eq!(session.expires_at, Some(4_600));
    assert_eq!(session.user.email.as_deref(), Some("ada@example.com"));
}

#[test]
fn parse_session_keeps_explicit_expires_at() {
    let body = r#"{"access_token":"a","refresh_token":"r","expires_in":10,"expires_at":99,"user":{"id":"u1"}}"#;
    assert_eq!(parse_session(body, 1_000).unwrap().expires_at, Some(99));
}

#[test]
fn parse_session_rejects_body_without_tokens() {
    assert!(matches!(parse_session(r#"{"user":{"id":"u1"}}"#, 0), Err(AuthError::Parse(_))));
}

#[test]
fn parse_sign_up_with_tokens_returns_session() {
    let response = parse_sign_up(TOKEN_BODY, 0).unwrap();
    assert_eq!(response.user.id, "u1");
    assert!(response.session.is_some());
}

#[test]
fn parse_sign_up_bare_user_means_verification_pending() {
    let response = parse_sign_up(r#"{"id":"u2","email":"new@example.com"}"#, 0).unwrap();
    assert_eq!(response.user.id, "u2");
    assert!(response.session.is_none());
}

#[test]
fn parse_sign_up_wrapped_user() {
    let response = parse_sign_up(r#"{"user":{"id":"u3"},"session":null}"#, 0).unwrap();
    assert_eq!(response.user.id, "u3");
    assert!(response.session.is_none());
}

// =============================================================================
// parse_fragment
// =============================================================================

#[test]
fn parse_fragment_reads_recovery_link() {
    let tokens = parse_fragment("#access_token=abc&refresh_token=def&expires_in=3600&token_type=bearer&type=recovery").unwrap();
    assert_eq!(tokens.access_token, "abc");
    assert_eq!(tokens.refresh_token, "def");
    assert_eq!(tokens.expires_in, Some(3600));
    assert_eq!(tokens.link_type.as_deref(), Some("recovery"));
}

#[test]
fn parse_fragment_without_access_token_is_none() {
    assert_eq!(parse_fragment(""), None);
    assert_eq!(parse_fragment("#error=access_denied"), None);
    assert_eq!(parse_fragment("access_token=&type=signup"), None);
}

// =============================================================================
// rows
// =============================================================================

#[test]
fn count_from_row_handles_null_and_missing() {
    assert_eq!(count_from_row(&serde_json::json!({"likes": 7}), "likes").unwrap(), 7);
    assert_eq!(count_from_row(&serde_json::json!({"likes": null}), "likes").unwrap(), 0);
    assert_eq!(count_from_row(&serde_json::json!({}), "likes").unwrap(), 0);
    assert!(count_from_row(&serde_json::json!({"likes": "7"}), "likes").is_err());
}

#[test]
fn first_row_of_empty_array_is_none() {
    assert_eq!(first_row("[]").unwrap(), None);
    assert_eq!(first_row(r#"[{"likes":1},{"likes":2}]"#).unwrap(), Some(serde_json::json!({"likes": 1})));
    assert!(first_row("{}").is_err());
}

// =============================================================================
// client
// =============================================================================

#[test]
fn urls_are_built_from_config() {
    let client = client_with(Arc::new(MemoryStore::new()));
    assert_eq!(client.auth_url("logout"), "https://proj.supabase.co/auth/v1/logout");
    let url = client.rest_url("videos", &[("id", "eq.v 1".to_owned())]).unwrap();
    assert_eq!(url.as_str(), "https://proj.supabase.co/rest/v1/videos?id=eq.v+1");
    let bare = client.rest_url("comments", &[]).unwrap();
    assert_eq!(bare.as_str(), "https://proj.supabase.co/rest/v1/comments");
}

#[test]
fn bearer_falls_back_to_anon_key() {
    let client = client_with(Arc::new(MemoryStore::new()));
    assert_eq!(client.bearer(), "anon-key");
}

#[tokio::test]
async fn persisted_session_is_restored_on_construction() {
    let store = Arc::new(MemoryStore::new());
    let mut session = session_for("u1");
    session.expires_at = Some(now_unix() + 3_600);
    storage::save_json(store.as_ref(), SESSION_KEY, &session).unwrap();

    let client = client_with(store);
    assert_eq!(client.bearer(), session.access_token);
    assert_eq!(client.get_session().await.unwrap(), Some(session));
}

#[tokio::test]
async fn get_session_without_session_is_none() {
    let client = client_with(Arc::new(MemoryStore::new()));
    assert_eq!(client.get_session().await.unwrap(), None);
}

#[tokio::test]
async fn operations_needing_a_session_fail_without_one() {
    let client = client_with(Arc::new(MemoryStore::new()));
    assert_eq!(client.update_password("hunter22").await.unwrap_err(), AuthError::NotAuthenticated);
    assert_eq!(client.refresh_session().await.unwrap_err(), AuthError::NotAuthenticated);
    let comment = NewComment {
        video_id: "v1".into(),
        user_id: "u1".into(),
        author_name: "ada".into(),
        content: "hi".into(),
    };
    assert_eq!(client.insert_comment(&comment).await.unwrap_err(), ContentError::NotAuthenticated);
}

#[tokio::test]
async fn sign_out_without_session_clears_storage_and_announces() {
    let store = Arc::new(MemoryStore::new());
    store.set(SESSION_KEY, "garbage").unwrap();
    let client = client_with(store.clone());
    let mut sub = client.subscribe();

    client.sign_out().await.unwrap();

    assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    let event = sub.next().await.unwrap();
    assert_eq!(event.change, AuthChange::SignedOut);
    assert!(event.session.is_none());
}

#[tokio::test]
async fn session_from_url_without_tokens_is_noop() {
    let client = client_with(Arc::new(MemoryStore::new()));
    assert_eq!(client.session_from_url("#type=recovery").await.unwrap(), None);
}
