use super::*;

#[test]
fn location_path_is_bare_pathname_without_extras() {
    assert_eq!(location_path("/videos", "", ""), "/videos");
}

#[test]
fn location_path_keeps_query_and_fragment() {
    assert_eq!(location_path("/videos", "tab=intro", "comments"), "/videos?tab=intro#comments");
}

#[test]
fn location_path_accepts_prefixed_parts() {
    assert_eq!(location_path("/videos", "?tab=intro", "#comments"), "/videos?tab=intro#comments");
    assert_eq!(location_path("/account", "?", "#"), "/account");
}
