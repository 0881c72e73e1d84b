//! # Worker Subsystem
//!
//! This crate runs the two background loops of the file modification
//! tracker: a bounded command dispatcher and a periodic snapshot collector.
//!
//! ## Features
//!
//! - **Command Queue**: Bounded FIFO with non-blocking enqueue
//! - **Dispatcher**: Runs queued commands one at a time as external processes
//! - **Scan Trigger**: Periodically refreshes the file snapshot
//! - **Lifecycle**: Start/stop with a blocking, ordered shutdown
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       WorkerService                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  enqueue ──► CommandQueue ──► Dispatcher ──► child process      │
//! │                                                                 │
//! │  interval ──► ScanTrigger ──► StatCollector                     │
//! │                    │                                            │
//! │                    ▼                                            │
//! │              SnapshotStore ◄── file_changes                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod collector;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod queue;
pub mod record;
pub mod scanner;
pub mod service;
pub mod snapshot;

pub use collector::StatCollector;
pub use config::WorkerConfig;
pub use dispatcher::{ExecOptions, run_command};
pub use error::{CommandExecutionError, QueueError, ScanError};
pub use queue::{CommandQueue, DEFAULT_QUEUE_CAPACITY};
pub use record::FileRecord;
pub use service::{LifecycleState, WorkerService, WorkerStatus};
pub use snapshot::SnapshotStore;
