//! Asynchronous IVCAP client.

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::request::{HttpResponse, RequestParts};

/// Tracing target for request dispatch.
pub const TRACING_TARGET: &str = "ivcap_client";

/// Asynchronous client for an IVCAP deployment.
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct Client {
    config: ClientConfig,
    http: reqwest::Client,
}

impl Client {
    /// Create a client from an explicit configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(auth_headers(&config)?)
            .build()?;
        Ok(Self { config, http })
    }

    /// Create a client from `IVCAP_URL` and `IVCAP_JWT`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Dispatch a request and collect the raw response.
    pub(crate) async fn execute(&self, parts: RequestParts) -> Result<HttpResponse> {
        let url = parts.url(&self.config.base_url)?;
        debug!(target: TRACING_TARGET, method = %parts.method, url = %url, "dispatching request");

        let mut request = self.http.request(parts.method, url).query(&parts.query);
        if let Some(body) = &parts.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!(target: TRACING_TARGET, status, bytes = body.len(), "response received");

        Ok(HttpResponse { status, body })
    }
}

/// Default headers derived from the configuration (bearer auth, if any).
pub(crate) fn auth_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &config.token {
        let value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| Error::config("bearer token contains invalid header characters"))?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_headers_with_token() {
        let config = ClientConfig::parse("https://api.ivcap.net")
            .unwrap()
            .with_token("abc123");
        let headers = auth_headers(&config).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
    }

    #[test]
    fn test_auth_headers_without_token() {
        let config = ClientConfig::parse("https://api.ivcap.net").unwrap();
        let headers = auth_headers(&config).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_auth_headers_rejects_control_characters() {
        let config = ClientConfig::parse("https://api.ivcap.net")
            .unwrap()
            .with_token("bad\ntoken");
        assert!(auth_headers(&config).is_err());
    }
}
