//! API Routes
//!
//! Configures the Axum router with all product service endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    get_cached_handler, get_uncached_handler, health_handler, list_handler, metrics_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /product-api-with-cache/:id` - Product lookup through the cache
/// - `GET /product-api-without-cache/:id` - Product lookup straight from the store
/// - `GET /products` - All stored products
/// - `GET /stats` - Cache backend statistics
/// - `GET /metrics` - Prometheus lookup metrics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/product-api-with-cache/:id", get(get_cached_handler))
        .route("/product-api-without-cache/:id", get(get_uncached_handler))
        .route("/products", get(list_handler))
        .route("/stats", get(stats_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
