//! In-process cache backends
//!
//! Both the bounded (LRU) and unbounded map variants are a single
//! [`CacheStore`] behind a `tokio::sync::RwLock`.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore, EvictionPolicy};
use crate::models::Product;

/// A named in-process cache.
#[derive(Debug, Clone)]
pub struct LocalCache {
    name: Arc<str>,
    policy: EvictionPolicy,
    store: Arc<RwLock<CacheStore>>,
}

impl LocalCache {
    /// Creates a cache holding at most `max_entries`, evicting the least recently used.
    pub fn bounded(name: &str, max_entries: usize) -> Self {
        Self::with_policy(name, EvictionPolicy::bounded(max_entries))
    }

    /// Creates a cache that never evicts.
    pub fn unbounded(name: &str) -> Self {
        Self::with_policy(name, EvictionPolicy::unbounded())
    }

    fn with_policy(name: &str, policy: EvictionPolicy) -> Self {
        Self {
            name: Arc::from(name),
            policy,
            store: Arc::new(RwLock::new(CacheStore::new(policy))),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub async fn get(&self, key: &str) -> Option<Product> {
        // Write lock: a hit moves the key in the LRU order
        self.store.write().await.get(key)
    }

    pub async fn put(&self, key: &str, value: Product) {
        self.store.write().await.put(key.to_string(), value);
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}
