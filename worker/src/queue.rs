//! Bounded FIFO of pending commands.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{error, info};

use crate::error::QueueError;

/// Capacity used when none is configured.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Bounded command queue with many producers and a single consumer.
///
/// Enqueueing never waits for space. The receiving half lives behind a
/// mutex so that exactly one dispatcher drains it at a time, and so it
/// survives the dispatcher being stopped and started again.
pub struct CommandQueue {
    tx: mpsc::Sender<String>,
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
}

impl CommandQueue {
    /// Create a queue holding at most `capacity` commands (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));

        Self {
            tx,
            rx: Arc::new(Mutex::new(rx)),
        }
    }

    /// Push commands in order.
    ///
    /// Stops at the first command that does not fit. Commands accepted
    /// before that point stay queued.
    pub fn enqueue<I, S>(&self, commands: I) -> Result<(), QueueError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for command in commands {
            let command = command.into();
            // The queue owns the receiver, so a full buffer is the only way
            // a send can fail.
            if let Err(e) = self.tx.try_send(command.clone()) {
                let command = e.into_inner();
                error!(command = %command, "command queue is full");
                return Err(QueueError::Full { command });
            }
            info!(command = %command, "command enqueued");
        }

        Ok(())
    }

    /// Number of commands waiting to be dispatched.
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Check if no commands are waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed capacity of the queue.
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    pub(crate) fn receiver(&self) -> Arc<Mutex<mpsc::Receiver<String>>> {
        Arc::clone(&self.rx)
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn drain(queue: &CommandQueue) -> Vec<String> {
        let rx = queue.receiver();
        let mut rx = rx.lock().await;
        let mut out = Vec::new();
        while let Ok(command) = rx.try_recv() {
            out.push(command);
        }
        out
    }

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = CommandQueue::new(10);
        queue.enqueue(["echo a", "echo b"]).unwrap();
        queue.enqueue(vec!["echo c".to_string()]).unwrap();

        assert_eq!(queue.len(), 3);
        assert_eq!(drain(&queue).await, vec!["echo a", "echo b", "echo c"]);
        assert!(queue.is_empty());
    }

    #[tokio::test]
    async fn test_full_queue_keeps_earlier_commands() {
        let queue = CommandQueue::new(2);

        let err = queue.enqueue(["first", "second", "third", "fourth"]).unwrap_err();
        assert_eq!(
            err,
            QueueError::Full {
                command: "third".to_string()
            }
        );

        assert_eq!(queue.len(), 2);
        assert_eq!(drain(&queue).await, vec!["first", "second"]);
    }

    #[test]
    fn test_fill_default_capacity() {
        let queue = CommandQueue::default();
        for _ in 0..DEFAULT_QUEUE_CAPACITY {
            queue.enqueue(["echo test"]).unwrap();
        }

        let err = queue.enqueue(["echo test"]).unwrap_err();
        assert_eq!(err.to_string(), "command queue is full");
        assert_eq!(queue.len(), queue.capacity());
    }

    #[tokio::test]
    async fn test_accepts_commands_after_consumer_releases_receiver() {
        let queue = CommandQueue::new(2);
        {
            let rx = queue.receiver();
            let _consumer = rx.lock().await;
        }

        queue.enqueue(["echo again"]).unwrap();
        assert_eq!(drain(&queue).await, vec!["echo again"]);
    }

    #[test]
    fn test_empty_commands_are_not_validated() {
        let queue = CommandQueue::new(1);
        queue.enqueue([""]).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_zero_capacity_rounds_up() {
        let queue = CommandQueue::new(0);
        assert_eq!(queue.capacity(), 1);
    }
}
