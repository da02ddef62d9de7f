//! Relation command - lists users connected to the current user.

use std::sync::Arc;

use user_discovery::{
    DiscoveryTransport, Relation, UserDiscoveryOperation,
    constants::{RELATION_FOLLOW, RELATION_FRIEND},
};

use crate::cli::RelationArgs;
use crate::output::OutputFormat;

/// Resolve a relation name, using the built-in definitions where they exist
fn relation_named(name: &str) -> Relation {
    match name {
        RELATION_FRIEND => Relation::friend(),
        RELATION_FOLLOW => Relation::follow(),
        other => Relation::new(other),
    }
}

/// Run the relation command
pub async fn run(
    args: &RelationArgs,
    transport: Arc<dyn DiscoveryTransport>,
    count: bool,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut op = UserDiscoveryOperation::by_relation(relation_named(&args.name));
    if let Some(direction) = args.direction {
        op.set_relation_direction(direction.into())?;
    }
    op.set_requires_overall_count(count)?;
    tracing::debug!(
        relation = %args.name,
        direction = %op.relation_direction(),
        "Querying relation"
    );
    super::execute(op, transport, format).await
}
