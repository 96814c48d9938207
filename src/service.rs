//! Product Service
//!
//! Cache-aside access to products: consult the cache, fall back to the store
//! on a miss, fill the cache with what the store returned. Every call is
//! counted and timed per path.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use crate::cache::CacheBackend;
use crate::error::Result;
use crate::metrics::{ErrorSource, LookupMetrics, LookupPath};
use crate::models::Product;
use crate::repository::ProductRepository;

/// Cached and uncached product lookups over one backend and one store.
///
/// The backend is fixed for the lifetime of the service; only its contents change.
#[derive(Clone)]
pub struct ProductService {
    backend: CacheBackend,
    repository: Arc<dyn ProductRepository>,
    metrics: Arc<LookupMetrics>,
}

impl ProductService {
    pub fn new(
        backend: CacheBackend,
        repository: Arc<dyn ProductRepository>,
        metrics: Arc<LookupMetrics>,
    ) -> Self {
        Self {
            backend,
            repository,
            metrics,
        }
    }

    pub fn backend(&self) -> &CacheBackend {
        &self.backend
    }

    pub fn metrics(&self) -> &LookupMetrics {
        &self.metrics
    }

    /// Looks a product up through the cache.
    ///
    /// A backend failure degrades to a plain store read. Absent products are
    /// never cached, so a record written later is picked up on the next lookup.
    ///
    /// # Errors
    /// `StoreUnavailable` when the store cannot be read; `Ok(None)` always
    /// means the store confirmed the product does not exist.
    pub async fn lookup(&self, id: &str) -> Result<Option<Product>> {
        let started = Instant::now();
        let cache = self.backend.name();
        self.metrics.record_request(cache, LookupPath::Cached);

        let result = self.lookup_through_cache(id).await;

        self.metrics
            .observe_latency(cache, LookupPath::Cached, started.elapsed());
        result
    }

    /// Looks a product up in the store only, bypassing the cache entirely.
    pub async fn lookup_uncached(&self, id: &str) -> Result<Option<Product>> {
        let started = Instant::now();
        let cache = self.backend.name();
        self.metrics.record_request(cache, LookupPath::Uncached);

        debug!("[lookup_uncached] Getting product with id {} from the store", id);
        let result = self.read_store(id, LookupPath::Uncached).await;

        self.metrics
            .observe_latency(cache, LookupPath::Uncached, started.elapsed());
        result
    }

    /// Every stored product, read from the store.
    pub async fn list_all(&self) -> Result<Vec<Product>> {
        self.repository.find_all().await
    }

    async fn lookup_through_cache(&self, id: &str) -> Result<Option<Product>> {
        let cache = self.backend.name();

        match self.backend.get(id).await {
            Ok(Some(product)) => {
                debug!("[lookup] Cache hit for product {} in {}", id, cache);
                return Ok(Some(product));
            }
            Ok(None) => {
                debug!("[lookup] Cache miss for product {} in {}", id, cache);
            }
            Err(e) => {
                warn!("[lookup] {} read failed, falling back to store: {}", cache, e);
                self.metrics
                    .record_error(cache, LookupPath::Cached, ErrorSource::Backend);
            }
        }

        let Some(product) = self.read_store(id, LookupPath::Cached).await? else {
            return Ok(None);
        };

        if let Err(e) = self.backend.put(id, product.clone()).await {
            warn!("[lookup] {} write failed for product {}: {}", cache, id, e);
            self.metrics
                .record_error(cache, LookupPath::Cached, ErrorSource::Backend);
        }

        Ok(Some(product))
    }

    async fn read_store(&self, id: &str, path: LookupPath) -> Result<Option<Product>> {
        self.repository.find_by_id(id).await.inspect_err(|e| {
            warn!("[{}] Store read failed for product {}: {}", path, id, e);
            self.metrics
                .record_error(self.backend.name(), path, ErrorSource::Store);
        })
    }
}
