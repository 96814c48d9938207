//! Cache Store Module
//!
//! Synchronous entry map combining HashMap storage with LRU tracking and
//! TTL / max-idle expiration. Every backend variant that holds entries is
//! built on one of these behind its own lock.

use std::collections::HashMap;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, LruTracker};
use crate::models::Product;

// == Eviction Policy ==
/// Bounds applied to a single named cache. `None` disables a bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Maximum number of entries before LRU eviction
    pub max_entries: Option<usize>,
    /// Lifetime since insertion, in milliseconds
    pub ttl_ms: Option<u64>,
    /// Lifetime since last access, in milliseconds
    pub max_idle_ms: Option<u64>,
}

impl EvictionPolicy {
    /// No bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Capacity bound only.
    pub fn bounded(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
            ..Self::default()
        }
    }

    /// Whether entries can expire on their own.
    pub fn is_timed(&self) -> bool {
        self.ttl_ms.is_some() || self.max_idle_ms.is_some()
    }
}

// == Cache Store ==
/// Entry storage for one named cache.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    policy: EvictionPolicy,
}

impl CacheStore {
    // == Constructor ==
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            policy,
        }
    }

    /// Replaces the bounds.
    ///
    /// A smaller capacity evicts least recently used entries right away;
    /// time bounds are judged by the new policy on next access.
    pub fn set_policy(&mut self, policy: EvictionPolicy) {
        self.policy = policy;
        if let Some(max_entries) = policy.max_entries {
            self.evict_down_to(max_entries.max(1));
        }
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Dead entries are removed and reported exactly like a missing key.
    pub fn get(&mut self, key: &str) -> Option<Product> {
        self.get_at(key, current_timestamp_ms())
    }

    pub fn get_at(&mut self, key: &str, now: u64) -> Option<Product> {
        let max_idle = self.policy.max_idle_ms;

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired_at(now, max_idle),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.touch(now);
        let value = entry.value.clone();
        self.lru.touch(key);
        self.stats.record_hit();
        Some(value)
    }

    // == Put ==
    /// Stores a snapshot, replacing any previous entry for the key.
    ///
    /// If the key is new and the store is at capacity, the least recently
    /// used entry is evicted first.
    pub fn put(&mut self, key: String, value: Product) {
        self.put_at(key, value, current_timestamp_ms())
    }

    pub fn put_at(&mut self, key: String, value: Product, now: u64) {
        let is_overwrite = self.entries.contains_key(&key);

        if let Some(max_entries) = self.policy.max_entries {
            if !is_overwrite {
                self.evict_down_to(max_entries.max(1) - 1);
            }
        }

        let entry = CacheEntry::new_at(value, self.policy.ttl_ms, now);
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Clear ==
    /// Removes every entry. Statistics survive.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats.set_total_entries(0);
    }

    // == Cleanup Expired ==
    /// Removes all dead entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        self.cleanup_expired_at(current_timestamp_ms())
    }

    pub fn cleanup_expired_at(&mut self, now: u64) -> usize {
        if !self.policy.is_timed() {
            return 0;
        }

        let max_idle = self.policy.max_idle_ms;
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now, max_idle))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    /// Whether a live entry exists, without touching clocks or stats.
    pub fn contains_at(&self, key: &str, now: u64) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now, self.policy.max_idle_ms))
    }

    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evicts least recently used entries until at most `limit` remain.
    fn evict_down_to(&mut self, limit: usize) {
        while self.entries.len() > limit {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                }
                None => break,
            }
        }
        self.stats.set_total_entries(self.entries.len());
    }

    fn remove_entry(&mut self, key: &str) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }
}
