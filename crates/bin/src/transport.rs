//! Transport creation from command line options.

use std::sync::Arc;

use user_discovery::transport::{
    DiscoveryTransport, HttpTransport, HttpTransportConfig, InMemoryDirectory,
};

use crate::cli::ConnectionArgs;

/// Redact the credentials embedded in an endpoint URL for safe logging
pub fn redact_endpoint(endpoint: &str) -> String {
    if let Ok(parsed) = url::Url::parse(endpoint) {
        let mut redacted = parsed.clone();
        if !parsed.username().is_empty() {
            let _ = redacted.set_username("***");
        }
        if parsed.password().is_some() {
            let _ = redacted.set_password(Some("***"));
        }
        redacted.to_string()
    } else {
        endpoint.to_string()
    }
}

/// Create the transport selected by the connection options
pub async fn create_transport(
    args: &ConnectionArgs,
) -> Result<Arc<dyn DiscoveryTransport>, Box<dyn std::error::Error>> {
    if let Some(path) = &args.directory {
        tracing::info!("Answering from local directory at {}", path.display());
        let directory = InMemoryDirectory::load_from_file(path)
            .await
            .map_err(|e| format!("Failed to load directory {}: {e}", path.display()))?;
        return Ok(Arc::new(directory));
    }

    tracing::info!("Using discovery backend at {}", redact_endpoint(&args.endpoint));
    let config = HttpTransportConfig {
        endpoint: args.endpoint.clone(),
        api_key: args.api_key.clone(),
        access_token: args.access_token.clone(),
        timeout_secs: args.timeout,
    };
    Ok(Arc::new(HttpTransport::new(config)?))
}
