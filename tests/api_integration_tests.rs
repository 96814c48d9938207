//! Integration Tests for API Endpoints
//!
//! Drives the full router for each endpoint and cache backend variant.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use product_cache::{
    api::create_router,
    cache::TtlGrid,
    config::{CacheSettings, Config},
    repository::{seed_catalog, InMemoryProductRepository},
    AppState,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

async fn create_test_app(settings: CacheSettings) -> (Router, Arc<InMemoryProductRepository>) {
    let repo = Arc::new(InMemoryProductRepository::new());
    seed_catalog(repo.as_ref(), 20).await.unwrap();

    let config = Config {
        cache: settings,
        ..Config::default()
    };
    let state = AppState::from_config(&config, repo.clone(), &Arc::new(TtlGrid::new()))
        .await
        .unwrap();

    (create_router(state), repo)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// == Cached Lookup Tests ==

#[tokio::test]
async fn test_cached_lookup_success() {
    let (app, repo) = create_test_app(CacheSettings::bounded_local(100)).await;

    let (status, json) = get(&app, "/product-api-with-cache/3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "3");
    assert_eq!(json["name"], "Product 3 name");
    assert_eq!(json["description"], "Product 3 description");
    assert_eq!(json["price"], 3.0);
    assert_eq!(repo.read_count(), 1);
}

#[tokio::test]
async fn test_cached_lookup_second_call_skips_store() {
    let (app, repo) = create_test_app(CacheSettings::bounded_local(100)).await;

    let (first, _) = get(&app, "/product-api-with-cache/5").await;
    let (second, json) = get(&app, "/product-api-with-cache/5").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(json["id"], "5");
    assert_eq!(repo.read_count(), 1);

    let (_, stats) = get(&app, "/stats").await;
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["total_entries"], 1);
    assert_eq!(stats["cache"], "ProductsLocalCache");
    assert_eq!(stats["backend"], "bounded-local");
    assert_eq!(stats["max_size"], 100);
    assert!(stats["ttl_ms"].is_null());
}

#[tokio::test]
async fn test_cached_lookup_not_found() {
    let (app, _) = create_test_app(CacheSettings::bounded_local(100)).await;

    let (status, json) = get(&app, "/product-api-with-cache/9999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("9999"));

    let (_, stats) = get(&app, "/stats").await;
    assert_eq!(stats["total_entries"], 0);
}

// == Uncached Lookup Tests ==

#[tokio::test]
async fn test_uncached_lookup_always_reads_store() {
    let (app, repo) = create_test_app(CacheSettings::bounded_local(100)).await;

    for _ in 0..3 {
        let (status, json) = get(&app, "/product-api-without-cache/7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["price"], 7.0);
    }

    assert_eq!(repo.read_count(), 3);
}

#[tokio::test]
async fn test_uncached_lookup_not_found() {
    let (app, _) = create_test_app(CacheSettings::disabled()).await;

    let (status, _) = get(&app, "/product-api-without-cache/unknown").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_outage_returns_service_unavailable() {
    let (app, repo) = create_test_app(CacheSettings::bounded_local(100)).await;
    repo.set_available(false);

    let (cached, json) = get(&app, "/product-api-with-cache/1").await;
    let (uncached, _) = get(&app, "/product-api-without-cache/1").await;

    assert_eq!(cached, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(uncached, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json.get("error").is_some());
}

// == Listing Tests ==

#[tokio::test]
async fn test_list_all_products() {
    let (app, repo) = create_test_app(CacheSettings::unbounded_local()).await;

    let (status, json) = get(&app, "/products").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 20);
    // Listing never touches find_by_id or the cache
    assert_eq!(repo.read_count(), 0);
    let (_, stats) = get(&app, "/stats").await;
    assert_eq!(stats["total_entries"], 0);
}

// == Backend Variant Tests ==

#[tokio::test]
async fn test_bounded_backend_evicts_least_recently_used() {
    let (app, repo) = create_test_app(CacheSettings::bounded_local(2)).await;

    get(&app, "/product-api-with-cache/1").await;
    get(&app, "/product-api-with-cache/2").await;
    get(&app, "/product-api-with-cache/1").await;
    get(&app, "/product-api-with-cache/3").await;
    assert_eq!(repo.read_count(), 3);

    // Product 1 was recently used and survives; product 2 was evicted
    get(&app, "/product-api-with-cache/1").await;
    assert_eq!(repo.read_count(), 3);
    get(&app, "/product-api-with-cache/2").await;
    assert_eq!(repo.read_count(), 4);

    let (_, stats) = get(&app, "/stats").await;
    assert_eq!(stats["evictions"], 2);
}

#[tokio::test]
async fn test_distributed_backend_expires_entries() {
    let settings = CacheSettings::distributed_ttl(
        Duration::from_millis(100),
        Duration::from_millis(100),
        100,
    );
    let (app, repo) = create_test_app(settings).await;

    get(&app, "/product-api-with-cache/4").await;
    get(&app, "/product-api-with-cache/4").await;
    assert_eq!(repo.read_count(), 1);

    tokio::time::sleep(Duration::from_millis(250)).await;

    let (status, _) = get(&app, "/product-api-with-cache/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(repo.read_count(), 2);

    let (_, stats) = get(&app, "/stats").await;
    assert_eq!(stats["backend"], "distributed-ttl");
    assert_eq!(stats["expirations"], 1);
    assert_eq!(stats["max_size"], 100);
    assert_eq!(stats["ttl_ms"], 100);
    assert_eq!(stats["max_idle_ms"], 100);
}

#[tokio::test]
async fn test_disabled_backend_never_caches() {
    let (app, repo) = create_test_app(CacheSettings::disabled()).await;

    for _ in 0..3 {
        let (status, _) = get(&app, "/product-api-with-cache/2").await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(repo.read_count(), 3);

    let (_, stats) = get(&app, "/stats").await;
    assert_eq!(stats["backend"], "disabled");
    assert!(stats["max_size"].is_null());
}

// == Metrics & Health Tests ==

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = create_test_app(CacheSettings::bounded_local(100)).await;

    get(&app, "/product-api-with-cache/1").await;
    get(&app, "/product-api-without-cache/1").await;

    let (status, body) = get_text(&app, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(
        "product_lookup_requests_total{cache=\"ProductsLocalCache\",path=\"cached\"} 1"
    ));
    assert!(body.contains(
        "product_lookup_requests_total{cache=\"ProductsLocalCache\",path=\"uncached\"} 1"
    ));
    assert!(body.contains("product_lookup_duration_seconds_count"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app(CacheSettings::bounded_local(100)).await;

    let (status, json) = get(&app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
