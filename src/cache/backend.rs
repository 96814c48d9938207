//! Cache Backend Module
//!
//! The single cache contract the lookup path depends on, dispatched over the
//! backend variants chosen at startup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cache::{CacheStats, DistributedTtlCache, EvictionPolicy, LocalCache};
use crate::config::BackendKind;
use crate::error::Result;
use crate::models::Product;

// == Disabled Cache ==
/// A cache that never stores anything; used to measure the uncached baseline.
#[derive(Debug, Clone)]
pub struct DisabledCache {
    name: Arc<str>,
    misses: Arc<AtomicU64>,
}

impl DisabledCache {
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            misses: Arc::new(AtomicU64::new(0)),
        }
    }

    fn get(&self) -> Option<Product> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            misses: self.misses.load(Ordering::Relaxed),
            ..CacheStats::default()
        }
    }
}

// == Cache Backend ==
/// One named cache behind one of the supported eviction strategies.
///
/// Clones share the same underlying entries, so a single backend selected at
/// startup can be handed to every consumer.
#[derive(Debug, Clone)]
pub enum CacheBackend {
    BoundedLocal(LocalCache),
    DistributedTtl(DistributedTtlCache),
    UnboundedLocal(LocalCache),
    Disabled(DisabledCache),
}

impl CacheBackend {
    pub fn kind(&self) -> BackendKind {
        match self {
            CacheBackend::BoundedLocal(_) => BackendKind::BoundedLocal,
            CacheBackend::DistributedTtl(_) => BackendKind::DistributedTtl,
            CacheBackend::UnboundedLocal(_) => BackendKind::UnboundedLocal,
            CacheBackend::Disabled(_) => BackendKind::Disabled,
        }
    }

    /// Name of the cache, used for metrics attribution.
    pub fn name(&self) -> &str {
        match self {
            CacheBackend::BoundedLocal(cache) | CacheBackend::UnboundedLocal(cache) => {
                cache.name()
            }
            CacheBackend::DistributedTtl(cache) => cache.name(),
            CacheBackend::Disabled(cache) => &*cache.name,
        }
    }

    /// Size and lifetime bounds of the named cache. A disabled cache has none.
    pub fn policy(&self) -> EvictionPolicy {
        match self {
            CacheBackend::BoundedLocal(cache) | CacheBackend::UnboundedLocal(cache) => {
                cache.policy()
            }
            CacheBackend::DistributedTtl(cache) => cache.policy(),
            CacheBackend::Disabled(_) => EvictionPolicy::unbounded(),
        }
    }

    /// Returns the cached value, or `None` when absent or expired.
    ///
    /// Only remote variants can fail, with `BackendUnavailable`.
    pub async fn get(&self, key: &str) -> Result<Option<Product>> {
        match self {
            CacheBackend::BoundedLocal(cache) | CacheBackend::UnboundedLocal(cache) => {
                Ok(cache.get(key).await)
            }
            CacheBackend::DistributedTtl(cache) => cache.get(key).await,
            CacheBackend::Disabled(cache) => Ok(cache.get()),
        }
    }

    /// Inserts or replaces the entry for `key`.
    pub async fn put(&self, key: &str, value: Product) -> Result<()> {
        match self {
            CacheBackend::BoundedLocal(cache) | CacheBackend::UnboundedLocal(cache) => {
                cache.put(key, value).await;
                Ok(())
            }
            CacheBackend::DistributedTtl(cache) => cache.put(key, value).await,
            CacheBackend::Disabled(_) => Ok(()),
        }
    }

    /// Removes every entry of the named cache.
    pub async fn clear(&self) -> Result<()> {
        match self {
            CacheBackend::BoundedLocal(cache) | CacheBackend::UnboundedLocal(cache) => {
                cache.clear().await;
                Ok(())
            }
            CacheBackend::DistributedTtl(cache) => cache.clear().await,
            CacheBackend::Disabled(_) => Ok(()),
        }
    }

    /// Drops expired entries. Only time-bounded variants have any.
    pub async fn purge_expired(&self) -> usize {
        match self {
            CacheBackend::DistributedTtl(cache) => cache.purge_expired().await,
            _ => 0,
        }
    }

    pub async fn stats(&self) -> CacheStats {
        match self {
            CacheBackend::BoundedLocal(cache) | CacheBackend::UnboundedLocal(cache) => {
                cache.stats().await
            }
            CacheBackend::DistributedTtl(cache) => cache.stats().await,
            CacheBackend::Disabled(cache) => cache.stats(),
        }
    }
}
