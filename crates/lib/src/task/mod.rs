//! Cancellable task primitives and a small operation runner.
//!
//! Operations do not own their scheduling. A runner hands each one a
//! [`CancelToken`] and keeps a [`TaskHandle`] for the caller; the operation
//! checks the token at its suspension points.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::{sync::watch, task::JoinHandle};
use uuid::Uuid;

use crate::Result;

pub mod errors;
pub mod queue;

pub use errors::TaskError;
pub use queue::{OperationQueue, QueueConfig};

/// A unit of work that can be scheduled by an [`OperationQueue`].
#[async_trait]
pub trait Operation: Send + 'static {
    /// Value produced when the operation reaches a terminal state.
    type Output: Send + 'static;

    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "operation"
    }

    /// Run the operation to completion.
    ///
    /// Implementations must stop emitting results once `cancel` fires.
    async fn run(&mut self, cancel: &CancelToken) -> Self::Output;
}

/// Shared cancellation flag.
///
/// Clones observe the same flag. Cancelling is permanent.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl CancelToken {
    /// Create a token that has not been cancelled.
    pub fn new() -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            flag: Arc::new(flag),
        }
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.send_replace(true);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        *self.flag.borrow()
    }

    /// Wait until cancellation is requested.
    pub async fn cancelled(&self) {
        let mut rx = self.flag.subscribe();
        // The sender lives as long as `self`, so this only returns once cancelled
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

/// Identifier assigned to each scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh task id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a running task: cancellation plus completion.
#[derive(Debug)]
pub struct TaskHandle<T> {
    id: TaskId,
    cancel: CancelToken,
    join: JoinHandle<T>,
}

impl<T> TaskHandle<T> {
    pub(crate) fn new(id: TaskId, cancel: CancelToken, join: JoinHandle<T>) -> Self {
        Self { id, cancel, join }
    }

    /// The task's id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Request cancellation of the task.
    ///
    /// The task still completes; it just stops producing results.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the task's cancellation token.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Check whether the task has finished.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the task's output.
    pub async fn join(self) -> Result<T> {
        let task_id = self.id.to_string();
        self.join.await.map_err(|e| {
            if e.is_cancelled() {
                TaskError::Aborted { task_id }.into()
            } else {
                TaskError::Panicked {
                    task_id,
                    reason: e.to_string(),
                }
                .into()
            }
        })
    }
}
