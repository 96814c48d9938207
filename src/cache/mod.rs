//! Cache Module
//!
//! Pluggable cache backends for product lookups: bounded LRU, distributed
//! TTL/max-idle, unbounded map and disabled.

mod backend;
mod distributed;
mod entry;
mod local;
mod lru;
mod selector;
mod stats;
mod store;


// Re-export public types
pub use backend::{CacheBackend, DisabledCache};
pub use distributed::{DistributedTtlCache, TtlGrid};
pub use entry::CacheEntry;
pub use local::LocalCache;
pub use lru::LruTracker;
pub use selector::select_backend;
pub use stats::CacheStats;
pub use store::{CacheStore, EvictionPolicy};

// == Public Constants ==
/// The single named cache this service stores products in
pub const PRODUCTS_CACHE_NAME: &str = "ProductsLocalCache";
