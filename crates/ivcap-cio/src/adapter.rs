//! The artifact I/O adapter contract.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::stream::{Readable, Writable};

/// Key/value metadata attached to an artifact.
pub type MetaMap = BTreeMap<String, String>;

/// Callback invoked with the server-assigned artifact ID.
///
/// Runs exactly once, synchronously inside the writable handle's `close`,
/// and only after the artifact was successfully persisted. This is the
/// only channel through which a caller learns the ID of a freshly written
/// artifact.
pub type OnClose = Box<dyn FnOnce(&str) + Send>;

/// Options for [`IoAdapter::read_artifact`] and [`IoAdapter::read_external`].
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Expect binary content (as opposed to text)
    pub binary_content: bool,
    /// Bypass any cache, forcing a fresh fetch
    pub no_caching: bool,
    /// Require a seekable handle; the adapter may have to materialize the
    /// stream to disk to satisfy this
    pub seekable: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            binary_content: true,
            no_caching: false,
            seekable: false,
        }
    }
}

impl ReadOptions {
    /// Expect text content.
    pub fn text(mut self) -> Self {
        self.binary_content = false;
        self
    }

    /// Bypass any cache.
    pub fn no_caching(mut self) -> Self {
        self.no_caching = true;
        self
    }

    /// Require a seekable handle.
    pub fn seekable(mut self) -> Self {
        self.seekable = true;
        self
    }
}

/// Options for [`IoAdapter::write_artifact`].
#[derive(Default)]
pub struct WriteOptions {
    /// Display name for the new artifact
    pub name: Option<String>,
    /// Collection to file the artifact under
    pub collection_name: Option<String>,
    /// Metadata records attached to the artifact
    pub metadata: Vec<MetaMap>,
    /// Require a seekable writer (needed by formats that rewrite a header
    /// after the body, e.g. NetCDF)
    pub seekable: bool,
    /// Invoked with the assigned artifact ID after successful persistence
    pub on_close: Option<OnClose>,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_collection(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = Some(collection_name.into());
        self
    }

    /// Append one metadata record.
    pub fn with_metadata(mut self, metadata: MetaMap) -> Self {
        self.metadata.push(metadata);
        self
    }

    pub fn seekable(mut self) -> Self {
        self.seekable = true;
        self
    }

    pub fn on_close(mut self, f: impl FnOnce(&str) + Send + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for WriteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteOptions")
            .field("name", &self.name)
            .field("collection_name", &self.collection_name)
            .field("metadata", &self.metadata)
            .field("seekable", &self.seekable)
            .field("on_close", &self.on_close.as_ref().map(|_| "…"))
            .finish()
    }
}

/// Descriptive view of a stored artifact, without its content.
#[derive(Debug, Clone)]
pub struct ArtifactInfo {
    pub mime_type: String,
    pub name: Option<String>,
    pub collection_name: Option<String>,
    pub metadata: Vec<MetaMap>,
    pub size: u64,
}

/// Mediates all artifact and external-URL byte access for a service
/// execution context.
///
/// Keeping store reads (`read_artifact`) apart from external reads
/// (`read_external`) lets an adapter apply store-specific optimizations
/// such as caching or integrity checks only where the store controls the
/// data, while execution code sees one streaming interface for both.
///
/// Operations that transfer data may suspend for the duration of the
/// transfer; none of them retry, and none impose a timeout.
#[async_trait]
pub trait IoAdapter: Send + Sync {
    /// Open an artifact's content for reading.
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) if the
    /// artifact does not exist, or
    /// [`Error::PermissionDenied`](crate::Error::PermissionDenied) if it
    /// exists but cannot be read.
    async fn read_artifact(
        &self,
        artifact_id: &str,
        opts: ReadOptions,
    ) -> Result<Box<dyn Readable>>;

    /// Open an external URL's content for reading.
    ///
    /// Fails with [`Error::Transport`](crate::Error::Transport) on a
    /// non-success response or connection failure.
    async fn read_external(&self, url: &Url, opts: ReadOptions) -> Result<Box<dyn Readable>>;

    /// Probe whether an artifact exists and is readable.
    ///
    /// Never fails and has no side effects; a missing artifact yields
    /// `false`.
    async fn artifact_readable(&self, artifact_id: &str) -> bool;

    /// Open a writer for a new artifact.
    ///
    /// The content is only persisted, and the artifact ID assigned, when
    /// the returned handle is closed. A handle that is dropped unclosed
    /// leaves no retrievable artifact behind.
    async fn write_artifact(
        &self,
        mime_type: &str,
        opts: WriteOptions,
    ) -> Result<Box<dyn Writable>>;
}

/// Reject mime types that cannot possibly tag an artifact.
pub(crate) fn validate_mime_type(mime_type: &str) -> Result<()> {
    let mut parts = mime_type.splitn(2, '/');
    let kind = parts.next().unwrap_or_default();
    let subtype = parts.next().unwrap_or_default();
    if kind.is_empty() || subtype.is_empty() {
        return Err(crate::Error::InvalidArgument(format!(
            "'{mime_type}' is not a valid mime type"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_options_defaults() {
        let opts = ReadOptions::default();
        assert!(opts.binary_content);
        assert!(!opts.no_caching);
        assert!(!opts.seekable);

        let opts = ReadOptions::default().text().no_caching().seekable();
        assert!(!opts.binary_content);
        assert!(opts.no_caching);
        assert!(opts.seekable);
    }

    #[test]
    fn test_write_options_builder() {
        let mut meta = MetaMap::new();
        meta.insert("source".to_string(), "sensor-7".to_string());

        let opts = WriteOptions::new()
            .with_name("scan.png")
            .with_collection("scans")
            .with_metadata(meta)
            .seekable()
            .on_close(|_| {});

        assert_eq!(opts.name.as_deref(), Some("scan.png"));
        assert_eq!(opts.collection_name.as_deref(), Some("scans"));
        assert_eq!(opts.metadata.len(), 1);
        assert!(opts.seekable);
        assert!(opts.on_close.is_some());
    }

    #[test]
    fn test_mime_type_validation() {
        assert!(validate_mime_type("image/png").is_ok());
        assert!(validate_mime_type("application/vnd.netcdf").is_ok());
        assert!(validate_mime_type("").is_err());
        assert!(validate_mime_type("image").is_err());
        assert!(validate_mime_type("image/").is_err());
        assert!(validate_mime_type("/png").is_err());
    }
}
