// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sg_core::FakeClock;

const KEY: &str = "product:1:lock";
const TTL: Duration = Duration::from_secs(5);

fn store() -> (MemoryLockStore<FakeClock>, FakeClock) {
    let clock = FakeClock::new();
    (MemoryLockStore::with_clock("mem-0", clock.clone()), clock)
}

#[tokio::test]
async fn set_is_conditional_on_absence() {
    let (store, _clock) = store();

    assert!(store.try_set(KEY, "a", TTL).await.unwrap());
    assert!(!store.try_set(KEY, "b", TTL).await.unwrap());
    assert_eq!(store.holder(KEY).as_deref(), Some("a"));
}

#[tokio::test]
async fn expired_key_can_be_taken_over() {
    let (store, clock) = store();

    store.try_set(KEY, "a", TTL).await.unwrap();
    clock.advance(TTL);

    assert_eq!(store.holder(KEY), None);
    assert!(store.try_set(KEY, "b", TTL).await.unwrap());
    assert_eq!(store.holder(KEY).as_deref(), Some("b"));
}

#[tokio::test]
async fn delete_requires_matching_token() {
    let (store, _clock) = store();
    store.try_set(KEY, "a", TTL).await.unwrap();

    assert!(!store.try_delete(KEY, "b").await.unwrap());
    assert_eq!(store.holder(KEY).as_deref(), Some("a"));

    assert!(store.try_delete(KEY, "a").await.unwrap());
    assert_eq!(store.holder(KEY), None);
}

#[tokio::test]
async fn delete_of_missing_or_expired_key_is_false_not_error() {
    let (store, clock) = store();
    assert!(!store.try_delete(KEY, "a").await.unwrap());

    store.try_set(KEY, "a", TTL).await.unwrap();
    clock.advance(TTL + Duration::from_millis(1));
    assert!(!store.try_delete(KEY, "a").await.unwrap());
}

#[tokio::test]
async fn stale_holder_cannot_release_new_owner() {
    let (store, clock) = store();
    store.try_set(KEY, "old", TTL).await.unwrap();
    clock.advance(TTL);
    store.try_set(KEY, "new", TTL).await.unwrap();

    assert!(!store.try_delete(KEY, "old").await.unwrap());
    assert_eq!(store.holder(KEY).as_deref(), Some("new"));
}

#[tokio::test]
async fn pttl_counts_down() {
    let (store, clock) = store();
    store.try_set(KEY, "a", TTL).await.unwrap();
    clock.advance(Duration::from_secs(2));
    assert_eq!(store.pttl(KEY), Some(Duration::from_secs(3)));
    assert_eq!(store.pttl("other"), None);
}
