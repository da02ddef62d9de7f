//! Transport abstractions for discovery requests.
//!
//! This module defines the transport trait that different backends must
//! implement, allowing the discovery operation to run against a remote HTTP
//! service or a local in-memory directory without knowing which.

use std::sync::Arc;

use async_trait::async_trait;

use crate::Result;

pub mod errors;
pub mod http;
pub mod in_memory;
pub mod protocol;

pub use errors::TransportError;
pub use http::{HttpTransport, HttpTransportConfig};
pub use in_memory::InMemoryDirectory;
pub use protocol::{DiscoveryRequest, DiscoveryResponse};

/// Trait for carrying a discovery request to a backend.
///
/// Implementations own serialization, authentication, retries and timeouts.
/// Failures are reported as [`TransportError`] wrapped in [`crate::Error`].
#[async_trait]
pub trait DiscoveryTransport: Send + Sync {
    /// Get the transport type identifier (e.g. "http", "in-memory").
    fn transport_type(&self) -> &'static str;

    /// Submit a request and wait for the backend's answer.
    ///
    /// # Arguments
    /// * `request` - The mode-specific request payload
    ///
    /// # Returns
    /// The decoded response, or the error that prevented obtaining one.
    async fn submit(&self, request: &DiscoveryRequest) -> Result<DiscoveryResponse>;
}

#[async_trait]
impl<T: DiscoveryTransport + ?Sized> DiscoveryTransport for Arc<T> {
    fn transport_type(&self) -> &'static str {
        (**self).transport_type()
    }

    async fn submit(&self, request: &DiscoveryRequest) -> Result<DiscoveryResponse> {
        (**self).submit(request).await
    }
}
