//! API Module
//!
//! HTTP handlers and routing for the product lookup REST API.
//!
//! # Endpoints
//! - `GET /product-api-with-cache/:id` - Cached lookup
//! - `GET /product-api-without-cache/:id` - Uncached lookup
//! - `GET /products` - List every product
//! - `GET /stats` - Cache statistics
//! - `GET /metrics` - Prometheus metrics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
