//! Blocking IVCAP client.
//!
//! Thin synchronous wrapper over the same request descriptors and
//! status-dispatch tables used by the async [`Client`](crate::Client).
//! Endpoint modules expose a `call_blocking` entry point taking this
//! client.
//!
//! Must not be used from within an async runtime; spawn onto a blocking
//! thread instead.

use tracing::debug;

use crate::client::{TRACING_TARGET, auth_headers};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::{HttpResponse, RequestParts};

/// Blocking client for an IVCAP deployment.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl Client {
    /// Create a blocking client from an explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(auth_headers(&config)?)
            .build()?;
        Ok(Self { config, http })
    }

    /// Create a blocking client from `IVCAP_URL` and `IVCAP_JWT`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Dispatch a request and collect the raw response.
    pub(crate) fn execute(&self, parts: RequestParts) -> Result<HttpResponse> {
        let url = parts.url(&self.config.base_url)?;
        debug!(target: TRACING_TARGET, method = %parts.method, url = %url, "dispatching request");

        let mut request = self.http.request(parts.method, url).query(&parts.query);
        if let Some(body) = &parts.body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        debug!(target: TRACING_TARGET, status, bytes = body.len(), "response received");

        Ok(HttpResponse { status, body })
    }
}
