//! Backend Selector
//!
//! Resolves the configured backend variant once at startup, validates its
//! parameters and hands back a freshly cleared cache.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::{
    CacheBackend, DisabledCache, DistributedTtlCache, LocalCache, TtlGrid, PRODUCTS_CACHE_NAME,
};
use crate::config::{BackendKind, CacheSettings};
use crate::error::{AppError, Result};

/// Builds the cache backend described by `settings`.
///
/// `grid` is only consulted for the distributed variant. Every named cache
/// the backend serves is cleared before it is returned, so nothing left by a
/// previous process is ever served.
///
/// # Errors
/// `ConfigurationInvalid` when a required parameter is missing, or whatever
/// the backend reports while being cleared.
pub async fn select_backend(settings: &CacheSettings, grid: &Arc<TtlGrid>) -> Result<CacheBackend> {
    let backend = build(settings, grid).await?;

    info!(
        "==== SETTING UP {} CACHE '{}' ====",
        backend.kind().as_str().to_uppercase(),
        backend.name()
    );

    debug!("Clearing cache with name {}", backend.name());
    backend.clear().await?;

    Ok(backend)
}

async fn build(settings: &CacheSettings, grid: &Arc<TtlGrid>) -> Result<CacheBackend> {
    match settings.kind {
        BackendKind::BoundedLocal => {
            let max_size = require(settings.max_size, settings.kind, "CACHE_MAX_SIZE")?;
            if max_size == 0 {
                return Err(AppError::ConfigurationInvalid(
                    "bounded-local cache needs a positive CACHE_MAX_SIZE".to_string(),
                ));
            }
            debug!("Bounded local cache with max_size={}", max_size);
            Ok(CacheBackend::BoundedLocal(LocalCache::bounded(
                PRODUCTS_CACHE_NAME,
                max_size,
            )))
        }
        BackendKind::DistributedTtl => {
            let ttl = require(settings.ttl, settings.kind, "CACHE_TTL_MS")?;
            let max_idle = require(settings.max_idle, settings.kind, "CACHE_MAX_IDLE_MS")?;
            let max_size = require(settings.max_size, settings.kind, "CACHE_MAX_SIZE")?;
            let cache =
                DistributedTtlCache::open(PRODUCTS_CACHE_NAME, grid.clone(), ttl, max_idle, max_size)
                    .await?;
            Ok(CacheBackend::DistributedTtl(cache))
        }
        BackendKind::UnboundedLocal => Ok(CacheBackend::UnboundedLocal(LocalCache::unbounded(
            PRODUCTS_CACHE_NAME,
        ))),
        BackendKind::Disabled => Ok(CacheBackend::Disabled(DisabledCache::new(
            PRODUCTS_CACHE_NAME,
        ))),
    }
}

fn require<T>(value: Option<T>, kind: BackendKind, key: &str) -> Result<T> {
    value.ok_or_else(|| {
        AppError::ConfigurationInvalid(format!("{} cache requires {} to be set", kind, key))
    })
}
