//! Expiry Sweeper Task
//!
//! Background task that periodically purges expired entries from the store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{ResponseStore, DEFAULT_SWEEP_INTERVAL_SECS};

/// Spawns a background task that purges expired cache entries every `interval`.
///
/// The interval restarts once a purge returns, so sweeps run back to back
/// from completion rather than on a fixed clock grid. The task exits when
/// `true` is sent on `shutdown` or the sender is dropped. Shutdown is only
/// observed while idle; a purge in flight always runs to completion.
/// A zero `interval` is replaced by the default hourly interval.
///
/// # Arguments
/// * `store` - Shared store handle
/// * `interval` - Idle time between sweeps
/// * `shutdown` - Receiver half of the shutdown channel
///
/// # Example
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_sweeper(store.clone(), Duration::from_secs(3600), shutdown_rx);
/// // Later, during shutdown:
/// let _ = shutdown_tx.send(true);
/// handle.await?;
/// ```
pub fn spawn_sweeper(
    store: Arc<dyn ResponseStore>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let interval = if interval.is_zero() {
        warn!(
            default_secs = DEFAULT_SWEEP_INTERVAL_SECS,
            "Zero sweep interval requested, using the default"
        );
        Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS)
    } else {
        interval
    };

    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "Starting expiry sweeper"
        );

        loop {
            tokio::select! {
                _ = stop_requested(&mut shutdown) => break,
                _ = tokio::time::sleep(interval) => {}
            }

            sweep_once(store.as_ref()).await;
        }

        info!("Expiry sweeper stopped");
    })
}

/// Resolves once `true` is sent or the sender is dropped.
///
/// Updates that leave the flag `false` are absorbed here, so they never
/// restart the idle timer.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

/// Runs a single purge and logs its outcome.
///
/// Returns the number of removed entries, or `None` if the purge failed.
/// Failures are never fatal; the next sweep simply tries again.
pub async fn sweep_once(store: &dyn ResponseStore) -> Option<u64> {
    match store.purge_expired().await {
        Ok(removed) if removed > 0 => {
            info!(removed, "Sweep: purged expired entries");
            Some(removed)
        }
        Ok(removed) => {
            debug!("Sweep: no expired entries found");
            Some(removed)
        }
        Err(e) => {
            warn!(error = %e, "Sweep failed, retrying next interval");
            None
        }
    }
}
