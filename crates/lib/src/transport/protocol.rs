//! Protocol definitions for discovery requests.
//!
//! This module defines transport-agnostic message types that every
//! transport (HTTP, in-memory) speaks.

use serde::{Deserialize, Serialize};

use crate::{
    constants::{ACTION_RELATION_QUERY, ACTION_USER_QUERY},
    relation::RelationDirection,
    user::User,
};

/// Request payload sent to the backend.
///
/// Only the fields of the active discovery mode are present.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "action")]
pub enum DiscoveryRequest {
    /// Look users up by email address.
    #[serde(rename = "user:query")]
    ByEmail {
        emails: Vec<String>,
        #[serde(default)]
        count: bool,
    },
    /// Query users by their relation to the current user.
    #[serde(rename = "relation:query")]
    ByRelation {
        name: String,
        direction: RelationDirection,
        #[serde(default)]
        count: bool,
    },
}

impl DiscoveryRequest {
    /// The wire action name of this request.
    pub fn action(&self) -> &'static str {
        match self {
            DiscoveryRequest::ByEmail { .. } => ACTION_USER_QUERY,
            DiscoveryRequest::ByRelation { .. } => ACTION_RELATION_QUERY,
        }
    }

    /// Whether the backend was asked to report the total number of matches.
    pub fn requests_count(&self) -> bool {
        match self {
            DiscoveryRequest::ByEmail { count, .. } | DiscoveryRequest::ByRelation { count, .. } => {
                *count
            }
        }
    }
}

/// Response returned from the backend.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryResponse {
    /// Resolved users, in backend order.
    #[serde(default)]
    pub users: Vec<User>,
    /// Requested emails for which no user exists (email lookups only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unmatched_emails: Option<Vec<String>>,
    /// Total number of matches, when the request asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

/// Error body returned by the backend alongside a non-success status.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Details of a backend error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
}
