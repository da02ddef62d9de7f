//! Error types for the discovery operation.

use thiserror::Error;

/// Errors raised by a discovery operation itself.
///
/// Transport failures are not represented here; they surface unchanged as
/// [`crate::Error::Transport`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DiscoveryError {
    /// A required field for the selected mode is missing or invalid.
    #[error("Invalid discovery configuration: {reason}")]
    Configuration { reason: String },

    /// Some requested emails matched no user. The resolved users are still delivered.
    #[error("No users found for {} of the requested emails", .unmatched_emails.len())]
    PartialFailure { unmatched_emails: Vec<String> },

    /// The operation is one-shot and has already been executed.
    #[error("Discovery operation has already been executed")]
    AlreadyExecuted,

    /// The operation was cancelled before reaching a terminal state.
    #[error("Discovery operation was cancelled")]
    Cancelled,
}

impl DiscoveryError {
    pub(crate) fn configuration(reason: impl Into<String>) -> Self {
        DiscoveryError::Configuration {
            reason: reason.into(),
        }
    }

    /// Check if this is a configuration error.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, DiscoveryError::Configuration { .. })
    }

    /// Check if this is a partial failure.
    pub fn is_partial_failure(&self) -> bool {
        matches!(self, DiscoveryError::PartialFailure { .. })
    }

    /// Check if the operation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DiscoveryError::Cancelled)
    }

    /// Check if a second execution was rejected.
    pub fn is_already_executed(&self) -> bool {
        matches!(self, DiscoveryError::AlreadyExecuted)
    }

    /// Emails for which no user was found, for partial failures.
    pub fn unmatched_emails(&self) -> Option<&[String]> {
        match self {
            DiscoveryError::PartialFailure { unmatched_emails } => Some(unmatched_emails),
            _ => None,
        }
    }
}

impl From<DiscoveryError> for crate::Error {
    fn from(err: DiscoveryError) -> Self {
        crate::Error::Discovery(err)
    }
}
