//! Distributed TTL cache backend
//!
//! [`TtlGrid`] models a data grid that lives outside any single cache handle:
//! it holds named maps, each with its own TTL / max-idle / max-size policy,
//! and its contents survive the handles that wrote them. That is why the
//! backend selector clears the map before a new process incarnation uses it.
//!
//! The grid can be disconnected, after which every call fails with
//! [`AppError::BackendUnavailable`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, EvictionPolicy};
use crate::error::{AppError, Result};
use crate::models::Product;

// == TTL Grid ==
/// Shared store of named maps with per-map eviction policies.
#[derive(Debug)]
pub struct TtlGrid {
    maps: RwLock<HashMap<String, CacheStore>>,
    connected: AtomicBool,
}

impl TtlGrid {
    pub fn new() -> Self {
        Self {
            maps: RwLock::new(HashMap::new()),
            connected: AtomicBool::new(true),
        }
    }

    /// Simulates losing the connection to the grid.
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(AppError::BackendUnavailable(
                "TTL grid is not reachable".to_string(),
            ))
        }
    }

    /// Creates the named map or applies a new policy to an existing one.
    ///
    /// Existing entries are kept, trimmed to the new size bound; callers that
    /// need a clean slate clear the map.
    pub async fn open_map(&self, name: &str, policy: EvictionPolicy) -> Result<()> {
        self.ensure_connected()?;
        let mut maps = self.maps.write().await;
        maps.entry(name.to_string())
            .and_modify(|store| store.set_policy(policy))
            .or_insert_with(|| CacheStore::new(policy));
        Ok(())
    }

    /// Runs `f` against the named map, creating it with `policy` if absent.
    async fn with_map<T>(
        &self,
        name: &str,
        policy: EvictionPolicy,
        f: impl FnOnce(&mut CacheStore) -> T,
    ) -> Result<T> {
        self.ensure_connected()?;
        let mut maps = self.maps.write().await;
        let store = maps
            .entry(name.to_string())
            .or_insert_with(|| CacheStore::new(policy));
        Ok(f(store))
    }
}

impl Default for TtlGrid {
    fn default() -> Self {
        Self::new()
    }
}

// == Distributed TTL Cache ==
/// A handle onto one named map of a [`TtlGrid`].
#[derive(Debug, Clone)]
pub struct DistributedTtlCache {
    name: Arc<str>,
    grid: Arc<TtlGrid>,
    policy: EvictionPolicy,
}

impl DistributedTtlCache {
    /// Opens the named map with the given limits.
    ///
    /// A zero duration or size disables that bound.
    pub async fn open(
        name: &str,
        grid: Arc<TtlGrid>,
        ttl: Duration,
        max_idle: Duration,
        max_size: usize,
    ) -> Result<Self> {
        let policy = EvictionPolicy {
            max_entries: (max_size > 0).then_some(max_size),
            ttl_ms: non_zero_ms(ttl),
            max_idle_ms: non_zero_ms(max_idle),
        };

        debug!(
            "Opening grid map {} with ttl={:?}, max_idle={:?}, max_size={}",
            name, ttl, max_idle, max_size
        );
        grid.open_map(name, policy).await?;

        Ok(Self {
            name: Arc::from(name),
            grid,
            policy,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub async fn get(&self, key: &str) -> Result<Option<Product>> {
        self.grid
            .with_map(&self.name, self.policy, |store| store.get(key))
            .await
    }

    pub async fn put(&self, key: &str, value: Product) -> Result<()> {
        self.grid
            .with_map(&self.name, self.policy, |store| {
                store.put(key.to_string(), value)
            })
            .await
    }

    pub async fn clear(&self) -> Result<()> {
        self.grid
            .with_map(&self.name, self.policy, CacheStore::clear)
            .await
    }

    /// Drops dead entries; returns 0 when the grid is unreachable.
    pub async fn purge_expired(&self) -> usize {
        self.grid
            .with_map(&self.name, self.policy, CacheStore::cleanup_expired)
            .await
            .unwrap_or(0)
    }

    pub async fn stats(&self) -> CacheStats {
        self.grid
            .with_map(&self.name, self.policy, |store| store.stats())
            .await
            .unwrap_or_default()
    }
}

/// Zero disables the bound; anything shorter than a millisecond rounds up to 1.
fn non_zero_ms(duration: Duration) -> Option<u64> {
    if duration.is_zero() {
        return None;
    }
    Some(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX).max(1))
}
