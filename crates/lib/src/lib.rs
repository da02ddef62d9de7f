//!
//! User discovery: find users on a remote backend by email address or by their
//! relation to the current user.
//!
//! ## Core Concepts
//!
//! * **Operations (`discovery::UserDiscoveryOperation`)**: A one-shot request configured with
//!   exactly one discovery target, either a list of emails or a relation plus direction.
//! * **Relations (`relation::Relation`)**: Named, possibly directional edges between the
//!   current user and other users, such as `follow` or `friend`.
//! * **Transports (`transport::DiscoveryTransport`)**: Pluggable request/response carriers.
//!   `HttpTransport` talks to a remote backend and `InMemoryDirectory` answers locally.
//! * **Tasks (`task::OperationQueue`)**: A small runner that schedules operations on tokio,
//!   bounds their concurrency and hands out cancellable `TaskHandle`s.
//!
//! Results are delivered through an incremental per-user channel (callback and/or stream)
//! followed by exactly one terminal `discovery::DiscoveryOutcome`.

pub mod constants;
pub mod discovery;
pub mod relation;
pub mod task;
pub mod transport;
pub mod user;

pub use discovery::{DiscoveryMode, DiscoveryOutcome, UserDiscoveryOperation};
pub use relation::{Relation, RelationDirection};
pub use task::{CancelToken, OperationQueue, TaskHandle};
pub use transport::DiscoveryTransport;
pub use user::User;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured errors raised by the discovery operation itself
    #[error(transparent)]
    Discovery(discovery::DiscoveryError),

    /// Structured errors surfaced unchanged from a transport
    #[error(transparent)]
    Transport(transport::TransportError),

    /// Structured errors from the task runner
    #[error(transparent)]
    Task(task::TaskError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Discovery(_) => "discovery",
            Error::Transport(_) => "transport",
            Error::Task(_) => "task",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error was raised before any network interaction because
    /// the operation was misconfigured.
    pub fn is_configuration_error(&self) -> bool {
        match self {
            Error::Discovery(err) => err.is_configuration_error(),
            Error::Transport(err) => err.is_configuration_error(),
            _ => false,
        }
    }

    /// Check if this error reports emails that matched no user.
    ///
    /// A partial failure still comes with the users that were resolved.
    pub fn is_partial_failure(&self) -> bool {
        match self {
            Error::Discovery(err) => err.is_partial_failure(),
            _ => false,
        }
    }

    /// Check if this error came from the transport layer.
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Check if this error is a network/connection failure.
    pub fn is_network_error(&self) -> bool {
        match self {
            Error::Transport(err) => err.is_network_error(),
            _ => false,
        }
    }

    /// Check if this error is an authentication failure.
    pub fn is_authentication_error(&self) -> bool {
        match self {
            Error::Transport(err) => err.is_authentication_error(),
            _ => false,
        }
    }

    /// Check if the work was abandoned because it was cancelled.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Error::Discovery(err) => err.is_cancelled(),
            Error::Task(err) => err.is_cancelled(),
            _ => false,
        }
    }

    /// Check if this error rejects a second execution of a one-shot operation.
    pub fn is_already_executed(&self) -> bool {
        match self {
            Error::Discovery(err) => err.is_already_executed(),
            _ => false,
        }
    }

    /// Emails for which no user was found, if this is a partial failure.
    pub fn unmatched_emails(&self) -> Option<&[String]> {
        match self {
            Error::Discovery(err) => err.unmatched_emails(),
            _ => None,
        }
    }
}
