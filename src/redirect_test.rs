use super::*;
use crate::storage::MemoryStore;
use crate::test_helpers::BlockedStore;

fn store() -> (Arc<MemoryStore>, RedirectStore) {
    let mem = Arc::new(MemoryStore::new());
    let redirect = RedirectStore::new(mem.clone());
    (mem, redirect)
}

#[test]
fn remember_then_peek() {
    let (mem, redirect) = store();
    redirect.remember("/videos");
    assert_eq!(redirect.peek().as_deref(), Some("/videos"));
    assert_eq!(mem.get(REDIRECT_KEY).unwrap().as_deref(), Some("/videos"));
}

#[test]
fn later_write_wins() {
    let (_, redirect) = store();
    redirect.remember("/videos");
    redirect.remember("/subscription");
    assert_eq!(redirect.peek().as_deref(), Some("/subscription"));
}

#[test]
fn take_clears_record() {
    let (mem, redirect) = store();
    redirect.remember("/videos");
    assert_eq!(redirect.take().as_deref(), Some("/videos"));
    assert_eq!(redirect.peek(), None);
    assert!(mem.is_empty());
}

#[test]
fn empty_record_reads_as_absent() {
    let (mem, redirect) = store();
    mem.set(REDIRECT_KEY, "").unwrap();
    assert_eq!(redirect.peek(), None);
}

#[test]
fn blocked_storage_forgets_quietly() {
    let redirect = RedirectStore::new(Arc::new(BlockedStore));
    redirect.remember("/videos");
    assert_eq!(redirect.peek(), None);
    assert_eq!(redirect.take(), None);
    redirect.clear();
}
