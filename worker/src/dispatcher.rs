//! Sequential execution of queued commands.

use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::CommandExecutionError;

/// Controls how long a single command may run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOptions {
    /// Kill the command after this long.
    pub timeout: Option<Duration>,

    /// Kill the command when the stop signal fires.
    pub kill_on_stop: bool,
}

/// Single consumer of the command queue.
pub(crate) struct Dispatcher {
    receiver: Arc<Mutex<mpsc::Receiver<String>>>,
    options: ExecOptions,
}

impl Dispatcher {
    pub(crate) fn new(receiver: Arc<Mutex<mpsc::Receiver<String>>>, options: ExecOptions) -> Self {
        Self { receiver, options }
    }

    /// Drain the queue until `cancel` fires.
    ///
    /// Commands run one at a time. The stop signal is only observed between
    /// commands unless `kill_on_stop` is set.
    pub(crate) async fn run(self, cancel: CancellationToken) {
        let mut rx = self.receiver.lock().await;
        info!("dispatcher started");

        loop {
            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                command = rx.recv() => command,
            };
            // The queue holds a sender for its whole life, so `recv` only
            // yields `None` if the queue itself was dropped.
            let Some(command) = received else {
                break;
            };

            self.dispatch(&command, &cancel).await;
        }

        info!("dispatcher stopped");
    }

    async fn dispatch(&self, command: &str, cancel: &CancellationToken) {
        info!(command, "executing command");

        match run_command(command, &self.options, cancel).await {
            Ok(output) => info!(command, output = %output, "command executed successfully"),
            Err(CommandExecutionError::Empty) => error!("empty command received"),
            Err(e) => error!(
                command,
                error = %e,
                output = %e.output(),
                "command execution failed"
            ),
        }
    }
}

/// Run one command line as an external process.
///
/// The line is split on whitespace into a program and its arguments; no
/// shell is involved. Returns stdout followed by stderr.
pub async fn run_command(
    command: &str,
    options: &ExecOptions,
    cancel: &CancellationToken,
) -> Result<String, CommandExecutionError> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        return Err(CommandExecutionError::Empty);
    };

    let mut child = Command::new(program);
    child.args(parts).kill_on_drop(true);

    let wait = async {
        let result = match options.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.output()).await {
                Ok(result) => result,
                Err(_) => return Err(CommandExecutionError::TimedOut(limit)),
            },
            None => child.output().await,
        };
        result.map_err(|source| CommandExecutionError::Spawn {
            program: program.to_string(),
            source,
        })
    };

    let output = if options.kill_on_stop {
        tokio::select! {
            output = wait => output?,
            _ = cancel.cancelled() => return Err(CommandExecutionError::Cancelled),
        }
    } else {
        wait.await?
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        Ok(combined)
    } else {
        Err(CommandExecutionError::Failed {
            status: output.status,
            output: combined,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::CommandQueue;
    use pretty_assertions::assert_eq;
    use std::time::Instant;
    use tracing_test::traced_test;

    async fn run(command: &str) -> Result<String, CommandExecutionError> {
        run_command(command, &ExecOptions::default(), &CancellationToken::new()).await
    }

    #[tokio::test]
    async fn test_echo_captures_output() {
        let output = run("echo hello").await.unwrap();
        assert_eq!(output, "hello\n");
    }

    #[tokio::test]
    async fn test_splits_on_any_whitespace() {
        let output = run("  echo\thello   world ").await.unwrap();
        assert_eq!(output, "hello world\n");
    }

    #[tokio::test]
    async fn test_empty_command() {
        assert!(matches!(run("").await, Err(CommandExecutionError::Empty)));
        assert!(matches!(run(" \t ").await, Err(CommandExecutionError::Empty)));
    }

    #[tokio::test]
    async fn test_non_zero_exit() {
        let err = run("false").await.unwrap_err();
        match err {
            CommandExecutionError::Failed { status, .. } => assert!(!status.success()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_failure_keeps_stderr() {
        let err = run("ls /definitely/not/a/real/path").await.unwrap_err();
        assert!(matches!(err, CommandExecutionError::Failed { .. }));
        assert!(!err.output().is_empty());
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = run("no-such-program-for-filemod-tests").await.unwrap_err();
        assert!(matches!(err, CommandExecutionError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_timeout_kills_command() {
        let options = ExecOptions {
            timeout: Some(Duration::from_millis(100)),
            kill_on_stop: false,
        };

        let start = Instant::now();
        let result = run_command("sleep 30", &options, &CancellationToken::new()).await;

        assert!(matches!(result, Err(CommandExecutionError::TimedOut(_))));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_cancel_kills_command_when_enabled() {
        let options = ExecOptions {
            timeout: None,
            kill_on_stop: true,
        };
        let cancel = CancellationToken::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let result = run_command("sleep 30", &options, &cancel).await;

        assert!(matches!(result, Err(CommandExecutionError::Cancelled)));
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_cancel_ignored_by_default() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let output = run_command("echo still-runs", &ExecOptions::default(), &cancel)
            .await
            .unwrap();
        assert_eq!(output, "still-runs\n");
    }

    #[tokio::test]
    #[traced_test]
    async fn test_dispatch_logs_success() {
        let queue = CommandQueue::new(1);
        let dispatcher = Dispatcher::new(queue.receiver(), ExecOptions::default());

        dispatcher
            .dispatch("echo hello", &CancellationToken::new())
            .await;

        assert!(logs_contain("executing command"));
        assert!(logs_contain("command executed successfully"));
        assert!(logs_contain("hello"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_dispatch_logs_failures() {
        let queue = CommandQueue::new(1);
        let dispatcher = Dispatcher::new(queue.receiver(), ExecOptions::default());
        let cancel = CancellationToken::new();

        dispatcher.dispatch("", &cancel).await;
        dispatcher.dispatch("false", &cancel).await;

        assert!(logs_contain("empty command received"));
        assert!(logs_contain("command execution failed"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_run_logs_echo_hello() {
        let queue = CommandQueue::new(10);
        queue.enqueue(["echo hello"]).unwrap();

        let cancel = CancellationToken::new();
        let dispatcher = Dispatcher::new(queue.receiver(), ExecOptions::default());

        // Drive the loop on the test task so its events land in the test span
        let stopper = async {
            let deadline = Instant::now() + Duration::from_secs(10);
            while !logs_contain("command executed successfully") && Instant::now() < deadline {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            cancel.cancel();
        };
        tokio::join!(dispatcher.run(cancel.clone()), stopper);

        assert!(logs_contain("dispatcher started"));
        assert!(logs_contain("executing command"));
        assert!(logs_contain("command executed successfully"));
        assert!(logs_contain("hello"));
        assert!(logs_contain("dispatcher stopped"));
    }

    #[tokio::test]
    async fn test_run_drains_in_order_until_cancelled() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let root = temp_dir.path().join("a");
        let nested = root.join("b");

        let queue = CommandQueue::new(10);
        queue
            .enqueue([
                format!("mkdir {}", root.display()),
                format!("mkdir {}", nested.display()),
            ])
            .unwrap();

        let cancel = CancellationToken::new();
        let dispatcher = Dispatcher::new(queue.receiver(), ExecOptions::default());
        let handle = tokio::spawn(dispatcher.run(cancel.clone()));

        let deadline = Instant::now() + Duration::from_secs(10);
        while !nested.exists() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(nested.is_dir());

        cancel.cancel();
        handle.await.unwrap();
        assert!(queue.is_empty());
    }
}
