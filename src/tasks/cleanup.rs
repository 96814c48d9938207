//! Expiry Sweep Task
//!
//! Background task that periodically drops expired entries from the active
//! cache backend, so dead entries do not linger until their next read.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheBackend;

/// Spawns a background task that purges expired entries every `interval`.
///
/// Backends without a time bound have nothing to purge; the task still runs
/// but every pass is a no-op.
///
/// # Returns
/// A JoinHandle for the spawned task, aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let sweep_handle = spawn_sweep_task(backend.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task(backend: CacheBackend, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting expiry sweep for {} ({}) every {:?}",
            backend.name(),
            backend.kind(),
            interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = backend.purge_expired().await;

            if removed > 0 {
                info!("Expiry sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiry sweep: no expired entries found");
            }
        }
    })
}
