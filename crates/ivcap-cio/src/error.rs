//! Error types for artifact I/O.

use thiserror::Error;
use url::Url;

/// Result type for artifact I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by adapters and the download helper.
///
/// None of these are retried or downgraded by the adapter layer itself;
/// the one exception is `artifact_readable`, which folds `NotFound` into
/// a `false` return.
#[derive(Debug, Error)]
pub enum Error {
    /// The artifact or external resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The resource exists but the caller may not access it
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Network failure, non-success HTTP status, or malformed response
    #[error("Transfer failed for {url}: {reason}")]
    Transport { url: String, reason: String },

    /// Unsupported mime type or malformed metadata shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Read, write, or seek on a handle that was already closed
    #[error("Stream '{0}' is closed")]
    Closed(String),

    /// Local file I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Sidecar metadata (de)serialization error
    #[error("Malformed metadata: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn transport(url: &Url, reason: impl ToString) -> Self {
        Error::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// True for the NotFound kind, in any wrapping.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
