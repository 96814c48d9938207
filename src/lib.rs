//! Product Cache - product lookups behind a pluggable cache-aside layer
//!
//! Serves product records from a store, optionally through one of several
//! interchangeable cache backends selected at startup: bounded LRU,
//! distributed TTL/max-idle, unbounded map or disabled.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repository;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use service::ProductService;
pub use tasks::spawn_sweep_task;
