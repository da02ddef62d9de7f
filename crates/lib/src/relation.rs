//! Relations between the current user and other users.
//!
//! A relation is a named edge such as `follow` or `friend`. Some relations are
//! inherently symmetric (a friendship is always mutual) while others are
//! directional and need a direction to be meaningful in a query.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{RELATION_FOLLOW, RELATION_FRIEND};

/// Direction of a relation edge, seen from the current user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RelationDirection {
    /// Edges from the current user to others (e.g. users I follow).
    #[default]
    #[serde(rename = "outward")]
    Outgoing,
    /// Edges from others to the current user (e.g. my followers).
    #[serde(rename = "inward")]
    Incoming,
    /// Edges that exist in both directions.
    #[serde(rename = "mutual")]
    Mutual,
}

impl RelationDirection {
    /// The string used for this direction on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationDirection::Outgoing => "outward",
            RelationDirection::Incoming => "inward",
            RelationDirection::Mutual => "mutual",
        }
    }
}

impl fmt::Display for RelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named relation, optionally carrying its own intrinsic direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relation {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    direction: Option<RelationDirection>,
}

impl Relation {
    /// Create a directional relation with no intrinsic direction.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: None,
        }
    }

    /// The built-in `friend` relation, which is always mutual.
    pub fn friend() -> Self {
        Self::new(RELATION_FRIEND).with_direction(RelationDirection::Mutual)
    }

    /// The built-in `follow` relation, which is directional.
    pub fn follow() -> Self {
        Self::new(RELATION_FOLLOW)
    }

    /// Give this relation an intrinsic direction.
    pub fn with_direction(mut self, direction: RelationDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Relation identifier sent to the backend.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The relation's own direction, if it has one.
    pub fn direction(&self) -> Option<RelationDirection> {
        self.direction
    }

    /// Whether the direction of a query over this relation must be chosen by the caller.
    pub fn is_directional(&self) -> bool {
        self.direction != Some(RelationDirection::Mutual)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Some(direction) => write!(f, "{} ({direction})", self.name),
            None => f.write_str(&self.name),
        }
    }
}
