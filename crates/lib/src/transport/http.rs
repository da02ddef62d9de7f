//! HTTP transport implementation for discovery requests.
//!
//! Requests are POSTed as JSON to a single endpoint (`{endpoint}/discovery`)
//! using reqwest. Credentials travel as headers on every request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header::CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use super::{
    DiscoveryTransport,
    errors::TransportError,
    protocol::{DiscoveryRequest, DiscoveryResponse, ErrorBody},
};
use crate::{
    Result,
    constants::{ACCESS_TOKEN_HEADER, API_KEY_HEADER, DEFAULT_TIMEOUT_SECS, DISCOVERY_PATH},
};

/// Configuration for [`HttpTransport`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpTransportConfig {
    /// Base URL of the backend
    pub endpoint: String,
    /// Application API key, sent as `X-Api-Key`
    pub api_key: Option<String>,
    /// Session access token of the current user, sent as `X-Access-Token`
    pub access_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000/".to_string(),
            api_key: None,
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HttpTransportConfig {
    /// Create a configuration for the given endpoint with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Resolve the full URL discovery requests are posted to.
    pub fn discovery_url(&self) -> std::result::Result<Url, TransportError> {
        let invalid = |reason: String| TransportError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason,
        };

        let mut base = Url::parse(&self.endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        // Url::join replaces the last path segment unless the base ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(DISCOVERY_PATH).map_err(|e| invalid(e.to_string()))
    }
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    config: HttpTransportConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport instance.
    ///
    /// Fails if the endpoint is not a valid http(s) URL.
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let url = config.discovery_url()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            config,
        })
    }

    /// The URL requests are sent to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    fn map_send_error(&self, err: reqwest::Error) -> TransportError {
        let address = self.url.to_string();
        if err.is_timeout() {
            TransportError::Timeout { address }
        } else if err.is_connect() {
            TransportError::ConnectionFailed {
                address,
                reason: err.to_string(),
            }
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl DiscoveryTransport for HttpTransport {
    fn transport_type(&self) -> &'static str {
        "http"
    }

    async fn submit(&self, request: &DiscoveryRequest) -> Result<DiscoveryResponse> {
        debug!(url = %self.url, action = request.action(), "Sending discovery request");

        let mut builder = self.client.post(self.url.clone()).json(request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.header(API_KEY_HEADER, api_key);
        }
        if let Some(token) = &self.config.access_token {
            builder = builder.header(ACCESS_TOKEN_HEADER, token);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        trace!(%status, content_type = ?response.headers().get(CONTENT_TYPE), "Received response");

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(format!("Failed to read response body: {e}")))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TransportError::Unauthorized {
                status: status.as_u16(),
            }
            .into());
        }

        if !status.is_success() {
            let (code, message) = match serde_json::from_slice::<ErrorBody>(&body) {
                Ok(ErrorBody { error }) => (error.code, error.message),
                Err(_) => (None, String::from_utf8_lossy(&body).into_owned()),
            };
            return Err(TransportError::Server {
                status: status.as_u16(),
                code,
                message,
            }
            .into());
        }

        let decoded: DiscoveryResponse = serde_json::from_slice(&body)
            .map_err(|e| TransportError::MalformedResponse(format!("{e}")))?;

        debug!(users = decoded.users.len(), "Discovery response decoded");
        Ok(decoded)
    }
}
