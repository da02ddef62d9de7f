//! Terminal result of a discovery operation.

use crate::{Error, Result, user::User};

/// How a discovery operation ended.
///
/// Exactly one outcome is produced per execution. Users delivered
/// incrementally before the outcome are the same users it carries.
#[derive(Debug)]
pub enum DiscoveryOutcome {
    /// Every request resolved.
    Found(Vec<User>),
    /// Some emails matched no user; `error` is a partial failure listing them.
    PartiallyFound { users: Vec<User>, error: Error },
    /// Nothing was resolved.
    Failed(Error),
}

impl DiscoveryOutcome {
    /// The users resolved by the operation. Empty when it failed.
    pub fn users(&self) -> &[User] {
        match self {
            DiscoveryOutcome::Found(users) | DiscoveryOutcome::PartiallyFound { users, .. } => {
                users
            }
            DiscoveryOutcome::Failed(_) => &[],
        }
    }

    /// The error reported with this outcome, if any.
    pub fn error(&self) -> Option<&Error> {
        match self {
            DiscoveryOutcome::Found(_) => None,
            DiscoveryOutcome::PartiallyFound { error, .. } | DiscoveryOutcome::Failed(error) => {
                Some(error)
            }
        }
    }

    /// Check if every request resolved without error.
    pub fn is_success(&self) -> bool {
        matches!(self, DiscoveryOutcome::Found(_))
    }

    /// Check if this is a partial failure.
    pub fn is_partial_failure(&self) -> bool {
        matches!(self, DiscoveryOutcome::PartiallyFound { .. })
    }

    /// Emails for which no user was found.
    pub fn unmatched_emails(&self) -> Option<&[String]> {
        self.error().and_then(Error::unmatched_emails)
    }

    /// Split into the resolved users and the optional error, the same pair the
    /// completion callback observes.
    pub fn into_parts(self) -> (Vec<User>, Option<Error>) {
        match self {
            DiscoveryOutcome::Found(users) => (users, None),
            DiscoveryOutcome::PartiallyFound { users, error } => (users, Some(error)),
            DiscoveryOutcome::Failed(error) => (Vec::new(), Some(error)),
        }
    }

    /// Strict view: any error, partial failures included, becomes `Err`.
    pub fn into_result(self) -> Result<Vec<User>> {
        match self {
            DiscoveryOutcome::Found(users) => Ok(users),
            DiscoveryOutcome::PartiallyFound { error, .. } | DiscoveryOutcome::Failed(error) => {
                Err(error)
            }
        }
    }
}
