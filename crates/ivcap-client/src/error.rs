//! Error types for the IVCAP client.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or dispatching a request.
///
/// A response with an out-of-contract status code is *not* an error; it
/// surfaces as the `Unknown` variant of the endpoint's outcome enum.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Payload (de)serialization error
    #[error("Failed to decode {context} payload: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Helper for creating configuration errors
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Error::Json { context, source }
    }
}
