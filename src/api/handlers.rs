//! API Handlers
//!
//! HTTP request handlers for each product service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::cache::{select_backend, TtlGrid};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::metrics::LookupMetrics;
use crate::models::{HealthResponse, ProductResponse, StatsResponse};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ProductService,
}

impl AppState {
    pub fn new(service: ProductService) -> Self {
        Self { service }
    }

    /// Creates the application state from configuration.
    ///
    /// Selects and clears the cache backend before anything can be served.
    pub async fn from_config(
        config: &Config,
        repository: Arc<dyn ProductRepository>,
        grid: &Arc<TtlGrid>,
    ) -> Result<Self> {
        let backend = select_backend(&config.cache, grid).await?;
        let metrics = Arc::new(LookupMetrics::new()?);
        Ok(Self::new(ProductService::new(backend, repository, metrics)))
    }
}

/// Handler for GET /product-api-with-cache/:id
pub async fn get_cached_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    match state.service.lookup(&id).await? {
        Some(product) => Ok(Json(product.into())),
        None => Err(AppError::NotFound(id)),
    }
}

/// Handler for GET /product-api-without-cache/:id
pub async fn get_uncached_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    match state.service.lookup_uncached(&id).await? {
        Some(product) => Ok(Json(product.into())),
        None => Err(AppError::NotFound(id)),
    }
}

/// Handler for GET /products
///
/// Lists every stored product, bypassing the cache.
pub async fn list_handler(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>> {
    let products = state.service.list_all().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let backend = state.service.backend();
    let stats = backend.stats().await;

    Json(StatsResponse::new(
        backend.name(),
        backend.kind().as_str(),
        &stats,
        &backend.policy(),
    ))
}

/// Handler for GET /metrics
///
/// Returns lookup metrics in the Prometheus text format.
pub async fn metrics_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.service.metrics().render()?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheSettings;
    use crate::models::Product;
    use crate::repository::InMemoryProductRepository;

    async fn test_state() -> AppState {
        let repo = Arc::new(InMemoryProductRepository::new());
        repo.save(Product::new("1", "Name 1", "Description 1", 1.0).unwrap())
            .await
            .unwrap();

        let config = Config {
            cache: CacheSettings::bounded_local(100),
            ..Config::default()
        };
        AppState::from_config(&config, repo, &Arc::new(TtlGrid::new()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_cached_handler() {
        let state = test_state().await;

        let response = get_cached_handler(State(state.clone()), Path("1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.name, "Name 1");

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.total_entries, 1);
    }

    #[tokio::test]
    async fn test_get_uncached_handler() {
        let state = test_state().await;

        let response = get_uncached_handler(State(state.clone()), Path("1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.price, 1.0);

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.total_entries, 0);
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let state = test_state().await;

        let result = get_cached_handler(State(state), Path("2".to_string())).await;
        assert!(matches!(result, Err(AppError::NotFound(id)) if id == "2"));
    }

    #[tokio::test]
    async fn test_list_handler() {
        let state = test_state().await;

        let response = list_handler(State(state)).await.unwrap();
        assert_eq!(response.len(), 1);
        assert_eq!(response[0].id, "1");
    }

    #[tokio::test]
    async fn test_from_config_rejects_incomplete_settings() {
        let config = Config {
            cache: CacheSettings {
                ttl: None,
                ..CacheSettings::distributed_ttl(
                    std::time::Duration::from_secs(1),
                    std::time::Duration::from_secs(1),
                    1,
                )
            },
            ..Config::default()
        };
        let repo = Arc::new(InMemoryProductRepository::new());

        let result = AppState::from_config(&config, repo, &Arc::new(TtlGrid::new())).await;
        assert!(matches!(result, Err(AppError::ConfigurationInvalid(_))));
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
