//! Bounded operation runner.
//!
//! Spawns each submitted [`Operation`] on the tokio runtime and limits how
//! many run at once with a semaphore. Operations waiting for a permit when the
//! queue shuts down are cancelled before they start.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{Instrument, debug, debug_span};

use super::{CancelToken, Operation, TaskHandle, TaskId, errors::TaskError};
use crate::{Result, constants::DEFAULT_MAX_CONCURRENT};

/// Configuration for an [`OperationQueue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum number of operations running at the same time
    pub max_concurrent: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

/// Schedules operations on the current tokio runtime.
#[derive(Debug, Clone)]
pub struct OperationQueue {
    permits: Arc<Semaphore>,
}

impl Default for OperationQueue {
    fn default() -> Self {
        Self::new(QueueConfig::default())
    }
}

impl OperationQueue {
    /// Create a queue. A `max_concurrent` of zero is treated as one.
    pub fn new(config: QueueConfig) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        }
    }

    /// Schedule an operation.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    /// Returns [`TaskError::QueueClosed`] after [`shutdown`](Self::shutdown).
    pub fn submit<O: Operation>(&self, mut operation: O) -> Result<TaskHandle<O::Output>> {
        if self.permits.is_closed() {
            return Err(TaskError::QueueClosed.into());
        }

        let id = TaskId::new();
        let cancel = CancelToken::new();
        let span = debug_span!("operation", task = %id, name = operation.name());

        let permits = Arc::clone(&self.permits);
        let task_cancel = cancel.clone();
        let join = tokio::spawn(
            async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        debug!("Queue shut down before operation started");
                        task_cancel.cancel();
                        None
                    }
                };
                debug!("Operation started");
                let output = operation.run(&task_cancel).await;
                debug!("Operation finished");
                output
            }
            .instrument(span),
        );

        Ok(TaskHandle::new(id, cancel, join))
    }

    /// Stop accepting new operations.
    ///
    /// Running operations continue; queued ones start already cancelled.
    pub fn shutdown(&self) {
        self.permits.close();
    }

    /// Check whether the queue still accepts operations.
    pub fn is_open(&self) -> bool {
        !self.permits.is_closed()
    }

    /// Number of operations that could start right now.
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }
}
