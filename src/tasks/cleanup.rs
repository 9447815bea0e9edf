//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries, so keys
//! that are written once and never re-read cannot accumulate forever.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically purges expired cache entries.
///
/// The task sleeps for the given interval between sweeps and takes the
/// write lock only for the duration of each sweep, so it can never
/// interleave with an in-flight cache operation.
///
/// Returns the JoinHandle for the spawned task; aborting it is how the
/// sweep is stopped during shutdown (see
/// [`Cache::stop`](crate::Cache::stop)).
pub fn spawn_sweep_task<V>(
    store: Arc<RwLock<CacheStore<V>>>,
    interval: Duration,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting expiry sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store_guard = store.write().await;
                store_guard.cleanup_expired()
            };

            if removed > 0 {
                info!(removed, "Expiry sweep removed expired entries");
            } else {
                debug!("Expiry sweep found no expired entries");
            }
        }
    })
}
