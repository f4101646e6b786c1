// erutcurts: Minecraft Bedrock structure converter for Discord
//
// SPDX-FileCopyrightText: 2023 Risu
// SPDX-License-Identifier: MIT

//! Map whose entries expire a fixed time after their last access.
//!
//! Expired entries are not dropped silently: callers drain them and decide
//! what to do with the values (the document store writes them back).

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Default time-to-idle used by the bot's caches.
pub const DEFAULT_EXPIRE_AFTER_ACCESS: Duration = Duration::from_secs(180);

#[derive(Debug)]
struct Entry<V> {
    value: V,
    last_access: Instant,
}

/// Expire-after-access cache.
#[derive(Debug)]
pub struct ExpiringCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, Entry<V>>,
}

impl<K, V> Default for ExpiringCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(DEFAULT_EXPIRE_AFTER_ACCESS)
    }
}

impl<K, V> ExpiringCache<K, V>
where
    K: Eq + Hash + Clone,
{
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live value for `key`, refreshing its access time.
    ///
    /// Expired entries are reported as absent but stay in the map until
    /// drained.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.get_at(key, Instant::now())
    }

    /// Value for `key` whether or not it has expired. Does not count as an
    /// access.
    pub fn peek_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key).map(|entry| &mut entry.value)
    }

    /// Insert or replace, returning the replaced value.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.insert_at(key, value, Instant::now())
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Remove and return every expired entry.
    pub fn drain_expired(&mut self) -> Vec<(K, V)> {
        self.drain_expired_at(Instant::now())
    }

    /// Remove and return every entry.
    pub fn drain_all(&mut self) -> Vec<(K, V)> {
        self.entries
            .drain()
            .map(|(key, entry)| (key, entry.value))
            .collect()
    }

    fn get_at(&mut self, key: &K, now: Instant) -> Option<&V> {
        let entry = self.entries.get_mut(key)?;
        if is_expired(entry.last_access, self.ttl, now) {
            return None;
        }
        entry.last_access = now;
        Some(&entry.value)
    }

    fn insert_at(&mut self, key: K, value: V, now: Instant) -> Option<V> {
        self.entries
            .insert(
                key,
                Entry {
                    value,
                    last_access: now,
                },
            )
            .map(|old| old.value)
    }

    fn drain_expired_at(&mut self, now: Instant) -> Vec<(K, V)> {
        let ttl = self.ttl;
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, entry)| is_expired(entry.last_access, ttl, now))
            .map(|(key, _)| key.clone())
            .collect();
        expired
            .into_iter()
            .filter_map(|key| self.entries.remove(&key).map(|entry| (key, entry.value)))
            .collect()
    }
}

fn is_expired(last_access: Instant, ttl: Duration, now: Instant) -> bool {
    now.saturating_duration_since(last_access) >= ttl
}

#[cfg(test)]
mod tests;
