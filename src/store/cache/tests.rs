// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

use std::time::{Duration, Instant};

use super::ExpiringCache;

#[test]
fn test_access_refreshes_expiry() {
    let start = Instant::now();
    let mut cache = ExpiringCache::new(Duration::from_secs(10));
    cache.insert_at("a", 1, start);

    assert_eq!(cache.get_at(&"a", start + Duration::from_secs(8)), Some(&1));
    assert!(cache.drain_expired_at(start + Duration::from_secs(12)).is_empty());
    assert_eq!(
        cache.drain_expired_at(start + Duration::from_secs(18)),
        [("a", 1)]
    );
    assert!(cache.is_empty());
}

#[test]
fn test_expired_entry_is_hidden_until_drained() {
    let start = Instant::now();
    let mut cache = ExpiringCache::new(Duration::from_secs(1));
    cache.insert_at("a", 1, start);

    assert_eq!(cache.get_at(&"a", start + Duration::from_secs(2)), None);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_insert_returns_replaced() {
    let mut cache = ExpiringCache::default();
    assert_eq!(cache.insert("a", 1), None);
    assert_eq!(cache.insert("a", 2), Some(1));
    assert_eq!(cache.remove(&"a"), Some(2));
    assert_eq!(cache.remove(&"a"), None);
}

#[test]
fn test_peek_mut_sees_expired_without_refreshing() {
    let start = Instant::now();
    let mut cache = ExpiringCache::new(Duration::from_secs(1));
    cache.insert_at("a", 1, start);

    if let Some(value) = cache.peek_mut(&"a") {
        *value += 1;
    }
    assert_eq!(
        cache.drain_expired_at(start + Duration::from_secs(2)),
        [("a", 2)]
    );
}

#[test]
fn test_drain_all_empties_cache() {
    let mut cache = ExpiringCache::new(Duration::from_secs(60));
    cache.insert("a", 1);
    cache.insert("b", 2);
    let mut drained = cache.drain_all();
    drained.sort_unstable();
    assert_eq!(drained, [("a", 1), ("b", 2)]);
    assert!(cache.is_empty());
}
