use super::*;

// =============================================================
// NoticeState
// =============================================================

#[test]
fn notice_default_is_hidden() {
    let state = NoticeState::default();
    assert_eq!(state.message, None);
    assert_eq!(state.tone, NoticeTone::Info);
}

#[test]
fn show_then_dismiss() {
    let mut state = NoticeState::default();
    state.show("Saved.", NoticeTone::Info);
    assert_eq!(state.message.as_deref(), Some("Saved."));
    state.dismiss();
    assert_eq!(state.message, None);
}

#[test]
fn stale_timer_does_not_dismiss_newer_notice() {
    let mut state = NoticeState::default();
    let first = state.show("one", NoticeTone::Info);
    let second = state.show("two", NoticeTone::Error);
    state.expire(first);
    assert_eq!(state.message.as_deref(), Some("two"));
    state.expire(second);
    assert_eq!(state.message, None);
}

// =============================================================
// outcome_notice
// =============================================================

#[test]
fn rollback_produces_notice() {
    let outcome = MutationOutcome::RolledBack(ContentError::Rejected { entity: "v1".into() });
    assert_eq!(outcome_notice("save your like", &outcome).as_deref(), Some("Could not save your like: update to v1 was rejected"));
}

#[test]
fn commit_and_block_are_silent() {
    assert_eq!(outcome_notice("post", &MutationOutcome::Committed), None);
    assert_eq!(outcome_notice("post", &MutationOutcome::Blocked), None);
}
