//! In-process user directory that answers discovery requests locally.
//!
//! The directory keeps a user table and a list of relation edges, all seen
//! from the point of view of a single current user. It can be persisted to
//! and restored from a JSON file.

use std::{collections::HashSet, path::Path};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, trace};
use uuid::Uuid;

use super::{
    DiscoveryTransport,
    protocol::{DiscoveryRequest, DiscoveryResponse},
};
use crate::{
    Result,
    relation::RelationDirection,
    user::{User, emails_equal},
};

/// A directed relation edge between two users.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationEdge {
    /// Relation name, e.g. `follow`
    pub relation: String,
    /// User the edge starts from
    pub from: String,
    /// User the edge points to
    pub to: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct DirectoryState {
    current_user: String,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    edges: Vec<RelationEdge>,
}

/// A local user directory implementing [`DiscoveryTransport`].
#[derive(Debug)]
pub struct InMemoryDirectory {
    state: RwLock<DirectoryState>,
}

impl InMemoryDirectory {
    /// Create an empty directory queried on behalf of `current_user`.
    pub fn new(current_user: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(DirectoryState {
                current_user: current_user.into(),
                ..DirectoryState::default()
            }),
        }
    }

    /// Load a directory previously written with [`save_to_file`](Self::save_to_file).
    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        let state: DirectoryState = serde_json::from_str(&json)?;
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Write the directory contents to a JSON file.
    pub async fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = {
            let state = self.state.read().await;
            serde_json::to_string_pretty(&*state)?
        };
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// The user discovery queries are answered for.
    pub async fn current_user(&self) -> String {
        self.state.read().await.current_user.clone()
    }

    /// Add a user record, replacing any existing record with the same id.
    pub async fn add_user(&self, user: User) {
        let mut state = self.state.write().await;
        state.users.retain(|existing| existing.id != user.id);
        state.users.push(user);
    }

    /// Register a new user with a generated id and the given email.
    ///
    /// Returns the new user's id.
    pub async fn register(&self, email: impl Into<String>) -> String {
        let user = User::new(Uuid::new_v4().to_string()).with_email(email);
        let id = user.id.clone();
        self.add_user(user).await;
        id
    }

    /// Number of users in the directory.
    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    /// Record a directed edge `from -> to` for `relation`.
    pub async fn add_edge(
        &self,
        relation: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) {
        let edge = RelationEdge {
            relation: relation.into(),
            from: from.into(),
            to: to.into(),
        };
        let mut state = self.state.write().await;
        if !state.edges.contains(&edge) {
            state.edges.push(edge);
        }
    }

    /// Record edges in both directions between `a` and `b`.
    pub async fn add_mutual_edge(
        &self,
        relation: impl Into<String>,
        a: impl Into<String>,
        b: impl Into<String>,
    ) {
        let (relation, a, b) = (relation.into(), a.into(), b.into());
        self.add_edge(relation.clone(), a.clone(), b.clone()).await;
        self.add_edge(relation, b, a).await;
    }
}

impl DirectoryState {
    fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    fn has_edge(&self, relation: &str, from: &str, to: &str) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.relation == relation && edge.from == from && edge.to == to)
    }

    fn find_by_emails(&self, emails: &[String]) -> (Vec<User>, Vec<String>) {
        let mut found: Vec<User> = Vec::new();
        let mut unmatched: Vec<String> = Vec::new();

        for email in emails {
            match self.users.iter().find(|user| user.has_email(email)) {
                Some(user) => {
                    if !found.iter().any(|seen| seen.id == user.id) {
                        found.push(user.clone());
                    }
                }
                None => {
                    if !unmatched.iter().any(|seen| emails_equal(seen, email)) {
                        unmatched.push(email.clone());
                    }
                }
            }
        }

        (found, unmatched)
    }

    fn find_by_relation(&self, relation: &str, direction: RelationDirection) -> Vec<User> {
        let me = self.current_user.as_str();
        let mut seen = HashSet::new();

        // Edge order defines response order
        self.edges
            .iter()
            .filter(|edge| edge.relation == relation)
            .filter_map(|edge| {
                let other = match direction {
                    RelationDirection::Outgoing if edge.from == me => &edge.to,
                    RelationDirection::Incoming if edge.to == me => &edge.from,
                    RelationDirection::Mutual
                        if edge.from == me && self.has_edge(relation, &edge.to, me) =>
                    {
                        &edge.to
                    }
                    _ => return None,
                };
                seen.insert(other.as_str()).then_some(other)
            })
            .filter_map(|id| self.user(id).cloned())
            .collect()
    }
}

#[async_trait]
impl DiscoveryTransport for InMemoryDirectory {
    fn transport_type(&self) -> &'static str {
        "in-memory"
    }

    async fn submit(&self, request: &DiscoveryRequest) -> Result<DiscoveryResponse> {
        let state = self.state.read().await;
        trace!(action = request.action(), "In-memory directory handling request");

        let (users, unmatched_emails) = match request {
            DiscoveryRequest::ByEmail { emails, .. } => {
                let (users, unmatched) = state.find_by_emails(emails);
                (users, Some(unmatched))
            }
            DiscoveryRequest::ByRelation {
                name, direction, ..
            } => (state.find_by_relation(name, *direction), None),
        };

        let total_count = request.requests_count().then_some(users.len() as u64);
        debug!(users = users.len(), "In-memory directory resolved users");

        Ok(DiscoveryResponse {
            users,
            unmatched_emails,
            total_count,
        })
    }
}
