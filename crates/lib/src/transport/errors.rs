//! Error types for the transport module.

use thiserror::Error;

/// Errors that can occur while submitting a discovery request.
///
/// These are surfaced to callers unchanged; the discovery operation never
/// maps them onto its own error kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// The configured endpoint is not a usable URL.
    #[error("Invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Client connection error.
    #[error("Failed to connect to {address}: {reason}")]
    ConnectionFailed { address: String, reason: String },

    /// The request did not complete within the configured timeout.
    #[error("Request to {address} timed out")]
    Timeout { address: String },

    /// The backend rejected our credentials.
    #[error("Not authorized (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The backend returned an error response.
    #[error("Server returned {status}: {message}")]
    Server {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Network communication error.
    #[error("Network error: {0}")]
    Network(String),
}

impl TransportError {
    /// Check if this is a configuration error (bad endpoint).
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, TransportError::InvalidEndpoint { .. })
    }

    /// Check if this is a network/connection error.
    pub fn is_network_error(&self) -> bool {
        matches!(
            self,
            TransportError::Network(_)
                | TransportError::ConnectionFailed { .. }
                | TransportError::Timeout { .. }
        )
    }

    /// Check if this is an authentication error.
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, TransportError::Unauthorized { .. })
    }

    /// Check if this is a protocol error (unexpected or undecodable response).
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            TransportError::MalformedResponse(_) | TransportError::Server { .. }
        )
    }
}

impl From<TransportError> for crate::Error {
    fn from(err: TransportError) -> Self {
        crate::Error::Transport(err)
    }
}
