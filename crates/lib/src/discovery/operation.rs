//! The user discovery operation.

use std::fmt;

use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, info_span, warn};

use super::{DiscoveryMode, DiscoveryOutcome, DiscoveryTarget, errors::DiscoveryError};
use crate::{
    Error, Result,
    relation::{Relation, RelationDirection},
    task::CancelToken,
    transport::{DiscoveryRequest, DiscoveryResponse, DiscoveryTransport},
    user::{User, emails_equal},
};

/// Callback invoked once per resolved user, in response order.
pub type PerUserCallback = Box<dyn FnMut(&User) + Send>;

/// Callback invoked exactly once when the operation completes.
pub type CompletionCallback = Box<dyn FnOnce(&[User], Option<&Error>) + Send>;

/// How a completed operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Success,
    PartialFailure,
    TransportError,
    ConfigurationError,
    Cancelled,
}

/// Lifecycle of a [`UserDiscoveryOperation`].
///
/// `Created -> Validating -> Executing -> Completed`, or straight from
/// `Validating` to `Completed(ConfigurationError)`. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Created,
    Validating,
    Executing,
    Completed(Completion),
}

/// Discovers users by email, or queries them by relation to the current user.
///
/// The mode is fixed by the constructor. Configuration may be changed until
/// the operation is executed; execution happens at most once.
pub struct UserDiscoveryOperation {
    target: DiscoveryTarget,
    relation_direction: Option<RelationDirection>,
    requires_overall_count: bool,
    overall_count: Option<u64>,
    per_user: Option<PerUserCallback>,
    completion: Option<CompletionCallback>,
    stream: Option<mpsc::UnboundedSender<User>>,
    state: OperationState,
}

impl fmt::Debug for UserDiscoveryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDiscoveryOperation")
            .field("target", &self.target)
            .field("relation_direction", &self.relation_direction)
            .field("requires_overall_count", &self.requires_overall_count)
            .field("overall_count", &self.overall_count)
            .field("has_per_user_callback", &self.per_user.is_some())
            .field("has_completion_callback", &self.completion.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl UserDiscoveryOperation {
    fn with_target(target: DiscoveryTarget) -> Self {
        Self {
            target,
            relation_direction: None,
            requires_overall_count: false,
            overall_count: None,
            per_user: None,
            completion: None,
            stream: None,
            state: OperationState::Created,
        }
    }

    /// Create an operation that discovers users by their email addresses.
    ///
    /// An empty list is valid and discovers nothing.
    pub fn by_emails<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_target(DiscoveryTarget::Emails(
            emails.into_iter().map(Into::into).collect(),
        ))
    }

    /// Create an operation that queries users by their relation to the current user.
    pub fn by_relation(relation: Relation) -> Self {
        Self::with_target(DiscoveryTarget::Relation {
            relation: Some(relation),
            direction: None,
        })
    }

    /// Create a relation query with an explicit direction.
    pub fn by_relation_with_direction(relation: Relation, direction: RelationDirection) -> Self {
        Self::with_target(DiscoveryTarget::Relation {
            relation: Some(relation),
            direction: Some(direction),
        })
    }

    /// The discovery mode chosen at construction.
    pub fn mode(&self) -> DiscoveryMode {
        self.target.mode()
    }

    /// The active discovery target.
    pub fn target(&self) -> &DiscoveryTarget {
        &self.target
    }

    /// Current lifecycle state.
    pub fn state(&self) -> OperationState {
        self.state
    }

    /// Emails to discover, in email mode.
    pub fn emails(&self) -> Option<&[String]> {
        match &self.target {
            DiscoveryTarget::Emails(emails) => Some(emails),
            DiscoveryTarget::Relation { .. } => None,
        }
    }

    /// Relation to query, in relation mode.
    pub fn relation(&self) -> Option<&Relation> {
        match &self.target {
            DiscoveryTarget::Relation { relation, .. } => relation.as_ref(),
            DiscoveryTarget::Emails(_) => None,
        }
    }

    /// The direction a relation query will use.
    ///
    /// Resolved as: value set with [`set_relation_direction`](Self::set_relation_direction),
    /// else the constructor direction, else the relation's intrinsic direction,
    /// else [`RelationDirection::Outgoing`].
    pub fn relation_direction(&self) -> RelationDirection {
        let (relation, constructed) = match &self.target {
            DiscoveryTarget::Relation {
                relation,
                direction,
            } => (relation.as_ref(), *direction),
            DiscoveryTarget::Emails(_) => (None, None),
        };
        self.relation_direction
            .or(constructed)
            .or_else(|| relation.and_then(Relation::direction))
            .unwrap_or_default()
    }

    /// Total number of matches reported by the backend.
    ///
    /// Only populated after execution, and only if the count was requested.
    pub fn overall_count(&self) -> Option<u64> {
        self.overall_count
    }

    fn ensure_configurable(&self) -> Result<()> {
        if self.state == OperationState::Created {
            Ok(())
        } else {
            Err(DiscoveryError::AlreadyExecuted.into())
        }
    }

    /// Replace the emails to discover. Ignored in relation mode.
    pub fn set_emails<I, S>(&mut self, emails: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_configurable()?;
        match &mut self.target {
            DiscoveryTarget::Emails(current) => {
                *current = emails.into_iter().map(Into::into).collect();
            }
            DiscoveryTarget::Relation { .. } => {
                debug!("Ignoring emails set on a relation discovery operation");
            }
        }
        Ok(())
    }

    /// Replace (or clear) the relation to query. Ignored in email mode.
    pub fn set_relation(&mut self, relation: impl Into<Option<Relation>>) -> Result<()> {
        self.ensure_configurable()?;
        match &mut self.target {
            DiscoveryTarget::Relation { relation: current, .. } => *current = relation.into(),
            DiscoveryTarget::Emails(_) => {
                debug!("Ignoring relation set on an email discovery operation");
            }
        }
        Ok(())
    }

    /// Set the relation direction. Takes precedence over every other source.
    pub fn set_relation_direction(&mut self, direction: RelationDirection) -> Result<()> {
        self.ensure_configurable()?;
        self.relation_direction = Some(direction);
        Ok(())
    }

    /// Ask the backend to report the total number of matches.
    pub fn set_requires_overall_count(&mut self, requires: bool) -> Result<()> {
        self.ensure_configurable()?;
        self.requires_overall_count = requires;
        Ok(())
    }

    /// Register the per-user callback.
    ///
    /// Never called if the whole operation fails, nor after completion.
    pub fn set_per_user_callback<F>(&mut self, callback: F) -> Result<()>
    where
        F: FnMut(&User) + Send + 'static,
    {
        self.ensure_configurable()?;
        self.per_user = Some(Box::new(callback));
        Ok(())
    }

    /// Register the completion callback, invoked exactly once with the
    /// resolved users and the error, if any.
    ///
    /// Not invoked when the operation is cancelled.
    pub fn set_completion_callback<F>(&mut self, callback: F) -> Result<()>
    where
        F: FnOnce(&[User], Option<&Error>) + Send + 'static,
    {
        self.ensure_configurable()?;
        self.completion = Some(Box::new(callback));
        Ok(())
    }

    /// Stream of resolved users, fed in the same order as the per-user callback.
    ///
    /// The stream closes when the operation reaches a terminal state.
    pub fn user_stream(&mut self) -> Result<mpsc::UnboundedReceiver<User>> {
        self.ensure_configurable()?;
        let (tx, rx) = mpsc::unbounded_channel();
        self.stream = Some(tx);
        Ok(rx)
    }

    /// Validate the configuration and build the request payload.
    ///
    /// # Errors
    /// [`DiscoveryError::Configuration`] if a blank email is present in email
    /// mode, or the relation is missing or unnamed in relation mode.
    pub fn build_request(&self) -> Result<DiscoveryRequest> {
        let count = self.requires_overall_count;
        match &self.target {
            DiscoveryTarget::Emails(emails) => {
                if let Some(index) = emails.iter().position(|email| email.trim().is_empty()) {
                    return Err(DiscoveryError::configuration(format!(
                        "email at index {index} is blank"
                    ))
                    .into());
                }
                Ok(DiscoveryRequest::ByEmail {
                    emails: emails.clone(),
                    count,
                })
            }
            DiscoveryTarget::Relation { relation, .. } => {
                let relation = relation.as_ref().ok_or_else(|| {
                    DiscoveryError::configuration("relation discovery requires a relation")
                })?;
                if relation.name().trim().is_empty() {
                    return Err(DiscoveryError::configuration("relation name is blank").into());
                }
                Ok(DiscoveryRequest::ByRelation {
                    name: relation.name().to_string(),
                    direction: self.relation_direction(),
                    count,
                })
            }
        }
    }

    /// Execute the operation against `transport`.
    ///
    /// Per-user notifications are emitted in response order, then the
    /// completion callback fires once and the same result is returned.
    /// A second call returns [`DiscoveryError::AlreadyExecuted`] without
    /// invoking any callback. If `cancel` fires, the in-flight request is
    /// dropped, no further callbacks run and the outcome is
    /// [`DiscoveryError::Cancelled`].
    pub async fn execute(
        &mut self,
        transport: &dyn DiscoveryTransport,
        cancel: &CancelToken,
    ) -> DiscoveryOutcome {
        if self.state != OperationState::Created {
            warn!(state = ?self.state, "Discovery operation executed more than once");
            return DiscoveryOutcome::Failed(DiscoveryError::AlreadyExecuted.into());
        }

        let span = info_span!(
            "user_discovery",
            mode = %self.mode(),
            transport = transport.transport_type()
        );
        self.run(transport, cancel).instrument(span).await
    }

    async fn run(
        &mut self,
        transport: &dyn DiscoveryTransport,
        cancel: &CancelToken,
    ) -> DiscoveryOutcome {
        if cancel.is_cancelled() {
            return self.abandon();
        }

        self.state = OperationState::Validating;
        let request = match self.build_request() {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Discovery configuration rejected");
                return self.finish(Completion::ConfigurationError, DiscoveryOutcome::Failed(e));
            }
        };

        self.state = OperationState::Executing;
        debug!(action = request.action(), "Submitting discovery request");

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return self.abandon(),
            response = transport.submit(&request) => response,
        };

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Discovery request failed");
                return self.finish(Completion::TransportError, DiscoveryOutcome::Failed(e));
            }
        };

        if request.requests_count() {
            self.overall_count = response.total_count;
        }

        let unmatched = match &self.target {
            DiscoveryTarget::Emails(emails) => unmatched_emails(emails, &response),
            DiscoveryTarget::Relation { .. } => Vec::new(),
        };

        for user in &response.users {
            if cancel.is_cancelled() {
                return self.abandon();
            }
            self.emit(user);
        }

        let users = response.users;
        if unmatched.is_empty() {
            info!(users = users.len(), "Discovery completed");
            self.finish(Completion::Success, DiscoveryOutcome::Found(users))
        } else {
            warn!(
                users = users.len(),
                unmatched = unmatched.len(),
                "Discovery completed with unmatched emails"
            );
            let error = DiscoveryError::PartialFailure {
                unmatched_emails: unmatched,
            }
            .into();
            self.finish(
                Completion::PartialFailure,
                DiscoveryOutcome::PartiallyFound { users, error },
            )
        }
    }

    fn emit(&mut self, user: &User) {
        debug!(user = %user.id, "Resolved user");
        if let Some(callback) = self.per_user.as_mut() {
            callback(user);
        }
        if let Some(stream) = &self.stream {
            // A dropped receiver just means nobody is listening
            let _ = stream.send(user.clone());
        }
    }

    fn finish(&mut self, completion: Completion, outcome: DiscoveryOutcome) -> DiscoveryOutcome {
        self.state = OperationState::Completed(completion);
        self.per_user = None;
        self.stream = None;
        if let Some(callback) = self.completion.take() {
            callback(outcome.users(), outcome.error());
        }
        outcome
    }

    fn abandon(&mut self) -> DiscoveryOutcome {
        info!("Discovery cancelled");
        self.state = OperationState::Completed(Completion::Cancelled);
        self.per_user = None;
        self.completion = None;
        self.stream = None;
        DiscoveryOutcome::Failed(DiscoveryError::Cancelled.into())
    }
}

/// Requested emails that no resolved user accounts for.
///
/// Prefers the backend's own list when it sends one, restricted to emails that
/// were actually requested. Otherwise derives it from the users' email fields.
/// Each email is reported once, in request order.
fn unmatched_emails(requested: &[String], response: &DiscoveryResponse) -> Vec<String> {
    let is_unmatched = |email: &String| match &response.unmatched_emails {
        Some(reported) => reported.iter().any(|r| emails_equal(r, email)),
        None => !response.users.iter().any(|user| user.has_email(email)),
    };

    let mut unmatched: Vec<String> = Vec::new();
    for email in requested.iter().filter(|email| is_unmatched(*email)) {
        if !unmatched.iter().any(|seen| emails_equal(seen, email)) {
            unmatched.push(email.clone());
        }
    }
    unmatched
}
