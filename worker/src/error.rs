//! Error types for the worker subsystem.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors returned when pushing commands onto the queue.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// No free slot was left for the command.
    #[error("command queue is full")]
    Full { command: String },
}

impl QueueError {
    /// The command that was rejected.
    pub fn command(&self) -> &str {
        match self {
            Self::Full { command } => command,
        }
    }
}

/// Errors from running a single queued command.
#[derive(Error, Debug)]
pub enum CommandExecutionError {
    /// The command had no tokens after splitting on whitespace.
    #[error("empty command")]
    Empty,

    /// The process could not be started or waited on.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("command exited with {status}")]
    Failed { status: ExitStatus, output: String },

    /// The process outlived the configured timeout and was killed.
    #[error("command timed out after {0:?}")]
    TimedOut(Duration),

    /// The process was killed because the workers were stopped.
    #[error("command cancelled by shutdown")]
    Cancelled,
}

impl CommandExecutionError {
    /// Output captured before the failure, if any.
    pub fn output(&self) -> &str {
        match self {
            Self::Failed { output, .. } => output,
            _ => "",
        }
    }
}

/// Errors from collecting file stats.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The directory walk failed at `path`.
    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading metadata failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The collector panicked or its task was torn down.
    #[error("stat collector did not complete: {0}")]
    Aborted(String),
}
