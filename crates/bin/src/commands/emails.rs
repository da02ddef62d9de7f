//! Emails command - resolves email addresses to users.

use std::sync::Arc;

use user_discovery::{DiscoveryTransport, UserDiscoveryOperation};

use crate::cli::EmailsArgs;
use crate::output::OutputFormat;

/// Run the emails command
pub async fn run(
    args: &EmailsArgs,
    transport: Arc<dyn DiscoveryTransport>,
    count: bool,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let mut op = UserDiscoveryOperation::by_emails(args.emails.iter().cloned());
    op.set_requires_overall_count(count)?;
    super::execute(op, transport, format).await
}
