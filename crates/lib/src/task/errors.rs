//! Error types for the task runner

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    #[error("Operation queue has been shut down")]
    QueueClosed,

    #[error("Task {task_id} was aborted before completing")]
    Aborted { task_id: String },

    #[error("Task {task_id} panicked: {reason}")]
    Panicked { task_id: String, reason: String },
}

impl TaskError {
    /// Check if the task ended because it was cancelled or aborted.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskError::Aborted { .. })
    }
}

impl From<TaskError> for crate::Error {
    fn from(err: TaskError) -> Self {
        crate::Error::Task(err)
    }
}
