//! Response DTOs for the product API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, EvictionPolicy};
use crate::models::Product;

/// Response body for a single product lookup
#[derive(Debug, Clone, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Named cache the stats belong to
    pub cache: String,
    /// Active backend variant
    pub backend: String,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Entry bound, null when unbounded
    pub max_size: Option<usize>,
    /// Time-to-live in milliseconds, null when disabled
    pub ttl_ms: Option<u64>,
    /// Max-idle time in milliseconds, null when disabled
    pub max_idle_ms: Option<u64>,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics and the active bounds
    pub fn new(
        cache: impl Into<String>,
        backend: impl Into<String>,
        stats: &CacheStats,
        policy: &EvictionPolicy,
    ) -> Self {
        Self {
            cache: cache.into(),
            backend: backend.into(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
            max_size: policy.max_entries,
            ttl_ms: policy.ttl_ms,
            max_idle_ms: policy.max_idle_ms,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
