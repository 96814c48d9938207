//! Product Cache - product lookups behind a pluggable cache-aside layer
//!
//! Binary entry point: configuration, seeding, backend selection, HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_cache::api::create_router;
use product_cache::cache::TtlGrid;
use product_cache::repository::{seed_catalog, InMemoryProductRepository};
use product_cache::{spawn_sweep_task, AppState, Config};

/// Main entry point for the product cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Seed the product store
/// 4. Select and clear the configured cache backend
/// 5. Start background expiry sweep
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
///
/// Any configuration or backend error aborts before the listener is bound.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "product_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Product Cache Service");

    let config = Config::from_env().context("invalid configuration")?;
    info!(
        "Configuration loaded: backend={}, max_size={:?}, ttl={:?}, max_idle={:?}, port={}, catalog_size={}",
        config.cache.kind,
        config.cache.max_size,
        config.cache.ttl,
        config.cache.max_idle,
        config.server_port,
        config.catalog_size
    );

    let repository = Arc::new(InMemoryProductRepository::new());
    seed_catalog(repository.as_ref(), config.catalog_size)
        .await
        .context("failed to seed product catalog")?;
    info!("Product catalog seeded with {} products", config.catalog_size);

    let grid = Arc::new(TtlGrid::new());
    let state = AppState::from_config(&config, repository, &grid)
        .await
        .context("failed to set up cache backend")?;
    info!("Cache backend ready");

    let sweep_handle = spawn_sweep_task(
        state.service.backend().clone(),
        Duration::from_secs(config.cleanup_interval.max(1)),
    );

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then stops the sweep task.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    sweep_handle.abort();
    warn!("Expiry sweep task aborted");
}
