//! Subcommand implementations.

use std::sync::Arc;

use user_discovery::{CancelToken, DiscoveryTransport, UserDiscoveryOperation};

use crate::output::{OutputFormat, print_outcome};

pub mod emails;
pub mod relation;

/// Exit code for a run where some emails matched nobody
pub const EXIT_PARTIAL: i32 = 2;

/// Execute `op`, cancelling it on Ctrl+C, and print the result.
///
/// Returns the process exit code.
pub async fn execute(
    mut op: UserDiscoveryOperation,
    transport: Arc<dyn DiscoveryTransport>,
    format: OutputFormat,
) -> Result<i32, Box<dyn std::error::Error>> {
    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling discovery");
            on_interrupt.cancel();
        }
    });

    let outcome = op.execute(transport.as_ref(), &cancel).await;
    interrupt.abort();

    print_outcome(&outcome, op.overall_count(), format)?;

    let code = match outcome.error() {
        None => 0,
        Some(e) if e.is_partial_failure() => EXIT_PARTIAL,
        Some(e) if e.is_cancelled() => 130,
        Some(_) => 1,
    };
    Ok(code)
}
