//! Periodic scans of the monitored directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::collector::{self, StatCollector};
use crate::snapshot::SnapshotStore;

/// Shortest interval the trigger accepts; the timer rejects zero.
const MIN_SCAN_INTERVAL: Duration = Duration::from_millis(1);

/// Timer loop that refreshes the snapshot on every tick.
pub(crate) struct ScanTrigger {
    collector: Arc<dyn StatCollector>,
    directory: PathBuf,
    interval: Duration,
    snapshot: Arc<SnapshotStore>,
}

impl ScanTrigger {
    pub(crate) fn new(
        collector: Arc<dyn StatCollector>,
        directory: PathBuf,
        interval: Duration,
        snapshot: Arc<SnapshotStore>,
    ) -> Self {
        Self {
            collector,
            directory,
            interval: interval.max(MIN_SCAN_INTERVAL),
            snapshot,
        }
    }

    /// Tick until `cancel` fires.
    ///
    /// The first scan happens one interval after start. Missed ticks are
    /// skipped, never queued, and a scan in progress always completes.
    pub(crate) async fn run(self, cancel: CancellationToken) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            directory = %self.directory.display(),
            interval = ?self.interval,
            "scan trigger started"
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => self.scan().await,
            }
        }

        info!("scan trigger stopped");
    }

    async fn scan(&self) {
        debug!("scan trigger woke up");

        let records =
            match collector::collect(Arc::clone(&self.collector), self.directory.clone()).await {
                Ok(records) => records,
                Err(e) => {
                    error!(
                        directory = %self.directory.display(),
                        error = %e,
                        "failed to get file stats"
                    );
                    return;
                }
            };

        for record in &records {
            info!(
                path = %record.path.display(),
                last_modified = %record.last_modified.to_rfc3339(),
                size = record.size,
                "file info"
            );
        }

        self.snapshot.replace(records).await;
    }
}
