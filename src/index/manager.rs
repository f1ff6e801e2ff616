//! Index lifecycle: initial build, periodic refresh, lookups
//!
//! The manager owns the builder and the snapshot store. The first build runs
//! synchronously at startup and its error is surfaced to the caller; when it
//! fails the manager still works in a degraded state (empty snapshot, every
//! lookup misses) until a later refresh succeeds. All subsequent builds run
//! on a background task whose failures are logged, never surfaced.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::core::config::DatasetConfig;
use crate::core::error::{IndexError, Result};
use crate::index::builder::IndexBuilder;
use crate::index::search;
use crate::index::snapshot::SnapshotStore;
use crate::system::metrics::Metrics;

/// Owns the dataset snapshot and keeps it fresh
pub struct IndexManager {
    builder: IndexBuilder,
    store: SnapshotStore,
    refresh_interval: Duration,
    read_timeout: Duration,
}

impl IndexManager {
    /// Create a manager for the configured dataset
    ///
    /// No I/O happens here; call [`IndexManager::refresh`] for the initial
    /// synchronous build.
    pub fn new(config: &DatasetConfig) -> Self {
        Self {
            builder: IndexBuilder::new(&config.path),
            store: SnapshotStore::new(),
            refresh_interval: config.refresh_interval,
            read_timeout: config.read_timeout,
        }
    }

    /// Rebuild the snapshot from the dataset and publish it
    ///
    /// The dataset read is bounded by the configured read timeout so a stuck
    /// source cannot stall future ticks. On failure the previously published
    /// snapshot stays authoritative.
    pub async fn refresh(&self) -> Result<()> {
        let metrics = Metrics::global();

        let snapshot = match tokio::time::timeout(self.read_timeout, self.builder.build()).await {
            Ok(Ok(snapshot)) => snapshot,
            Ok(Err(err)) => {
                metrics.index.refresh_failures.inc();
                return Err(err.into());
            }
            Err(_) => {
                metrics.index.refresh_failures.inc();
                return Err(IndexError::SourceTimeout {
                    timeout: self.read_timeout,
                }
                .into());
            }
        };

        let len = snapshot.len();
        self.store.publish(snapshot);

        metrics.index.refresh_success.inc();
        metrics.index.snapshot_size.set(len as i64);
        if let Ok(since_epoch) = SystemTime::now().duration_since(UNIX_EPOCH) {
            metrics
                .index
                .last_refresh_timestamp
                .set(since_epoch.as_secs() as i64);
        }

        info!(values = len, "index refreshed");
        Ok(())
    }

    /// Position of `target` in the current snapshot
    ///
    /// Never blocks on a refresh: the snapshot handle is cloned up front and
    /// the search runs against it without holding any lock. An empty
    /// (degraded) snapshot simply misses.
    pub fn lookup(&self, target: i64) -> Option<usize> {
        let snapshot = self.store.current();
        let position = search::search(snapshot.values(), target);

        let metrics = Metrics::global();
        metrics.index.lookups_total.inc();
        match position {
            Some(_) => metrics.index.lookups_found.inc(),
            None => metrics.index.lookups_not_found.inc(),
        }

        position
    }

    /// Time of the last successful refresh, if any
    pub fn last_refreshed(&self) -> Option<SystemTime> {
        self.store.current().published_at()
    }

    /// Number of values currently published
    pub fn snapshot_len(&self) -> usize {
        self.store.current().len()
    }

    /// Spawn the background refresh loop
    ///
    /// The loop rebuilds every `refresh_interval`; failures are logged and
    /// the loop continues with the previous snapshot. It exits when the
    /// returned handle is stopped (or dropped), without interrupting an
    /// in-flight publish.
    pub fn spawn_refresh(self: Arc<Self>) -> RefreshHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let manager = self;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(manager.refresh_interval);
            // The first tick completes immediately; the initial build
            // already ran synchronously at startup.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = manager.refresh().await {
                            error!(error = %err, "index refresh failed, keeping previous snapshot");
                        }
                    }
                    _ = stop_rx.changed() => {
                        info!("refresh loop stopping");
                        break;
                    }
                }
            }
        });

        RefreshHandle {
            stop: stop_tx,
            task,
        }
    }
}

/// Stops the background refresh loop
///
/// Dropping the handle also stops the loop at its next await point.
pub struct RefreshHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Signal the loop to exit and wait for it to finish
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}
