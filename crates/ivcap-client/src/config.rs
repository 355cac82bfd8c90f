//! Client configuration
//!
//! Loads configuration with priority:
//! 1. Explicit values via the builder-style setters
//! 2. Environment variables (`IVCAP_URL`, `IVCAP_JWT`)
//! 3. Defaults

use std::env;
use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Environment variable naming the deployment's base URL.
pub const ENV_URL: &str = "IVCAP_URL";

/// Environment variable carrying the bearer token.
pub const ENV_JWT: &str = "IVCAP_JWT";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for building a [`Client`](crate::Client) or
/// [`blocking::Client`](crate::blocking::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the IVCAP deployment
    pub base_url: Url,
    /// Bearer token attached to every request, if set
    pub token: Option<String>,
    /// Overall request timeout
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration for the given deployment URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: ensure_trailing_slash(base_url),
            token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("ivcap-sdk-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Parse a deployment URL string into a configuration.
    pub fn parse(base_url: &str) -> Result<Self> {
        Ok(Self::new(Url::parse(base_url)?))
    }

    /// Build a configuration from `IVCAP_URL` and `IVCAP_JWT`.
    pub fn from_env() -> Result<Self> {
        let raw = env::var(ENV_URL)
            .map_err(|_| Error::config(format!("environment variable {ENV_URL} is not set")))?;
        let mut config = Self::parse(&raw)?;
        config.token = env::var(ENV_JWT).ok();
        Ok(config)
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Endpoint paths are joined relative to the base URL, so its path must end
/// with a slash or `Url::join` would drop the final segment.
fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_base_path() {
        let config = ClientConfig::parse("https://api.ivcap.net").unwrap();
        assert_eq!(config.base_url.path(), "/");

        let config = ClientConfig::parse("https://host.example.com/ivcap").unwrap();
        assert_eq!(config.base_url.path(), "/ivcap/");
        assert_eq!(
            config.base_url.join("1/services").unwrap().as_str(),
            "https://host.example.com/ivcap/1/services"
        );
    }

    #[test]
    fn test_parse_rejects_invalid_url() {
        assert!(ClientConfig::parse("not a url").is_err());
    }

    #[test]
    fn test_builder_setters() {
        let config = ClientConfig::parse("https://api.ivcap.net")
            .unwrap()
            .with_token("secret")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent");

        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent");
    }
}
