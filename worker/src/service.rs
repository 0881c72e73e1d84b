//! Lifecycle control for the dispatcher and scan trigger.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::collector::{self, StatCollector};
use crate::config::WorkerConfig;
use crate::dispatcher::Dispatcher;
use crate::error::{QueueError, ScanError};
use crate::queue::CommandQueue;
use crate::record::FileRecord;
use crate::scanner::ScanTrigger;
use crate::snapshot::SnapshotStore;

/// Whether the background workers are running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// No workers are running.
    Stopped,

    /// The dispatcher and scan trigger are running.
    Running,

    /// A stop was requested and the workers are still winding down.
    Stopping,
}

/// Point-in-time view of the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerStatus {
    /// Lifecycle state.
    pub state: LifecycleState,

    /// Commands waiting in the queue.
    pub queue_len: usize,

    /// Fixed queue capacity.
    pub queue_capacity: usize,
}

struct RunningWorkers {
    cancel: CancellationToken,
    dispatcher: JoinHandle<()>,
    scanner: JoinHandle<()>,
}

enum Workers {
    Stopped,
    Running(RunningWorkers),
    Stopping,
}

/// Owns the command queue and snapshot store and runs the two workers.
///
/// The queue and the snapshot outlive start/stop cycles: commands enqueued
/// while stopped run after the next start, and the last snapshot stays
/// readable.
pub struct WorkerService {
    config: WorkerConfig,
    collector: Arc<dyn StatCollector>,
    queue: CommandQueue,
    snapshot: Arc<SnapshotStore>,
    // Never held across a worker join, so state queries answer at once.
    workers: Arc<Mutex<Workers>>,
}

impl WorkerService {
    /// Create a stopped service.
    pub fn new(config: WorkerConfig, collector: Arc<dyn StatCollector>) -> Self {
        Self {
            queue: CommandQueue::new(config.queue_capacity),
            config,
            collector,
            snapshot: Arc::new(SnapshotStore::new()),
            workers: Arc::new(Mutex::new(Workers::Stopped)),
        }
    }

    /// Spawn the dispatcher and scan trigger.
    ///
    /// Returns without waiting for the workers to begin looping. Returns
    /// `false` if they are running or still stopping.
    pub async fn start(&self) -> bool {
        let mut workers = self.workers.lock().await;
        match *workers {
            Workers::Stopped => {}
            Workers::Running(_) => {
                debug!("workers already running");
                return false;
            }
            Workers::Stopping => {
                debug!("workers still stopping");
                return false;
            }
        }

        let cancel = CancellationToken::new();
        let dispatcher = Dispatcher::new(self.queue.receiver(), self.config.exec_options());
        let scanner = ScanTrigger::new(
            Arc::clone(&self.collector),
            self.config.monitored_dir.clone(),
            self.config.scan_interval,
            Arc::clone(&self.snapshot),
        );

        *workers = Workers::Running(RunningWorkers {
            dispatcher: tokio::spawn(dispatcher.run(cancel.clone())),
            scanner: tokio::spawn(scanner.run(cancel.clone())),
            cancel,
        });

        info!("workers started");
        true
    }

    /// Signal both workers to stop and wait until they have exited.
    ///
    /// A command that is running is allowed to finish unless the service was
    /// configured to kill it, and so is a scan in progress. While waiting the
    /// state reads [`LifecycleState::Stopping`]. Returns `false` if the
    /// workers were not running, including when another stop is in progress.
    pub async fn stop(&self) -> bool {
        let running = {
            let mut workers = self.workers.lock().await;
            match std::mem::replace(&mut *workers, Workers::Stopping) {
                Workers::Running(running) => running,
                other => {
                    *workers = other;
                    debug!("workers not running");
                    return false;
                }
            }
        };

        running.cancel.cancel();

        // The join runs on its own task so the state still reaches `Stopped`
        // if this future is dropped.
        let workers = Arc::clone(&self.workers);
        let shutdown = tokio::spawn(async move {
            let (dispatcher, scanner) = tokio::join!(running.dispatcher, running.scanner);

            for (worker, result) in [("dispatcher", dispatcher), ("scan trigger", scanner)] {
                if let Err(e) = result {
                    error!(worker, error = %e, "worker exited abnormally");
                }
            }

            *workers.lock().await = Workers::Stopped;
        });

        if let Err(e) = shutdown.await {
            error!(error = %e, "worker shutdown failed");
        }

        info!("workers stopped");
        true
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> LifecycleState {
        match *self.workers.lock().await {
            Workers::Stopped => LifecycleState::Stopped,
            Workers::Running(_) => LifecycleState::Running,
            Workers::Stopping => LifecycleState::Stopping,
        }
    }

    /// State plus queue depth.
    pub async fn status(&self) -> WorkerStatus {
        WorkerStatus {
            state: self.state().await,
            queue_len: self.queue.len(),
            queue_capacity: self.queue.capacity(),
        }
    }

    /// Queue commands for the dispatcher.
    pub fn enqueue_commands<I, S>(&self, commands: I) -> Result<(), QueueError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queue.enqueue(commands)
    }

    /// Records from the most recent successful scan.
    pub async fn file_changes(&self) -> Arc<[FileRecord]> {
        self.snapshot.read().await
    }

    /// Scan `directory` now without touching the snapshot.
    pub async fn file_stats(
        &self,
        directory: impl Into<PathBuf>,
    ) -> Result<Vec<FileRecord>, ScanError> {
        collector::collect(Arc::clone(&self.collector), directory.into()).await
    }

    /// Commands waiting in the queue.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Fixed queue capacity.
    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// The configuration the service was built with.
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }
}

impl Drop for WorkerService {
    fn drop(&mut self) {
        if let Ok(workers) = self.workers.try_lock() {
            if let Workers::Running(running) = &*workers {
                running.cancel.cancel();
            }
        }
    }
}
