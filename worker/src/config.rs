//! Configuration for the worker subsystem.

use std::path::PathBuf;
use std::time::Duration;

use crate::dispatcher::ExecOptions;
use crate::queue::DEFAULT_QUEUE_CAPACITY;

/// Settings for the dispatcher and scan trigger.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Directory handed to the stat collector on every tick.
    pub monitored_dir: PathBuf,

    /// Time between scans.
    pub scan_interval: Duration,

    /// Maximum number of pending commands.
    pub queue_capacity: usize,

    /// Kill a command that runs longer than this.
    pub command_timeout: Option<Duration>,

    /// Kill the running command when the workers are stopped.
    pub kill_on_stop: bool,
}

impl WorkerConfig {
    /// Create a new worker config.
    pub fn new(monitored_dir: impl Into<PathBuf>, scan_interval: Duration) -> Self {
        Self {
            monitored_dir: monitored_dir.into(),
            scan_interval,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            command_timeout: None,
            kill_on_stop: false,
        }
    }

    /// Set the queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the per-command timeout.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = Some(timeout);
        self
    }

    /// Kill the running command on stop instead of waiting for it.
    pub fn kill_on_stop(mut self) -> Self {
        self.kill_on_stop = true;
        self
    }

    pub(crate) fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            timeout: self.command_timeout,
            kill_on_stop: self.kill_on_stop,
        }
    }
}
