//! User discovery.
//!
//! A [`UserDiscoveryOperation`] finds users in one of two ways, chosen when it
//! is constructed:
//!
//! * **By email**: the backend resolves each address to a user. Addresses that
//!   match nobody make the result a partial failure, which still carries every
//!   user that was found plus the unmatched addresses.
//! * **By relation**: the backend lists users connected to the current user by
//!   a relation such as `follow`, in a given direction.
//!
//! ```no_run
//! use user_discovery::{CancelToken, UserDiscoveryOperation};
//! use user_discovery::transport::{HttpTransport, HttpTransportConfig};
//!
//! # async fn example() -> user_discovery::Result<()> {
//! let transport = HttpTransport::new(HttpTransportConfig::new("https://api.example.com"))?;
//! let mut op = UserDiscoveryOperation::by_emails(["alice@example.com", "bob@example.com"]);
//! op.set_per_user_callback(|user| println!("found {}", user.id))?;
//!
//! let outcome = op.execute(&transport, &CancelToken::new()).await;
//! if let Some(missing) = outcome.unmatched_emails() {
//!     println!("invite: {missing:?}");
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;

use crate::relation::{Relation, RelationDirection};

pub mod errors;
pub mod operation;
pub mod outcome;
pub mod task;

pub use errors::DiscoveryError;
pub use operation::{
    Completion, CompletionCallback, OperationState, PerUserCallback, UserDiscoveryOperation,
};
pub use outcome::DiscoveryOutcome;
pub use task::{DiscoveryReport, DiscoveryTask};

/// The lookup strategy of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryMode {
    ByEmail,
    ByRelation,
}

impl fmt::Display for DiscoveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryMode::ByEmail => f.write_str("email"),
            DiscoveryMode::ByRelation => f.write_str("relation"),
        }
    }
}

/// What an operation looks for. Only the fields of one mode exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryTarget {
    /// Email addresses to resolve, in request order.
    Emails(Vec<String>),
    /// A relation to the current user, with the direction given at construction.
    Relation {
        relation: Option<Relation>,
        direction: Option<RelationDirection>,
    },
}

impl DiscoveryTarget {
    /// The mode this target belongs to.
    pub fn mode(&self) -> DiscoveryMode {
        match self {
            DiscoveryTarget::Emails(_) => DiscoveryMode::ByEmail,
            DiscoveryTarget::Relation { .. } => DiscoveryMode::ByRelation,
        }
    }
}
