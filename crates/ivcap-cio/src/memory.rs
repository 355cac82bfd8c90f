//! In-memory artifact I/O adapter.

use std::collections::HashMap;
use std::io::{self, Cursor};
use std::mem;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::AsyncWrite;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::adapter::{
    ArtifactInfo, IoAdapter, MetaMap, OnClose, ReadOptions, WriteOptions, validate_mime_type,
};
use crate::download::{DownloadOptions, download};
use crate::error::{Error, Result};
use crate::stream::{BufferReader, BufferSink, Mode, Readable, Writable};

/// Tracing target for the in-memory adapter.
pub const TRACING_TARGET: &str = "ivcap_cio::memory";

#[derive(Debug, Clone)]
struct StoredArtifact {
    mime_type: String,
    name: Option<String>,
    collection_name: Option<String>,
    metadata: Vec<MetaMap>,
    data: Vec<u8>,
}

type Store = Arc<RwLock<HashMap<String, StoredArtifact>>>;

/// In-memory artifact I/O adapter.
///
/// This is primarily for testing and demonstration purposes.
/// Artifacts are stored in memory and are not persisted across restarts;
/// every handle it returns is seekable.
#[derive(Clone, Default)]
pub struct InMemoryAdapter {
    artifacts: Store,
    http: reqwest::Client,
}

impl InMemoryAdapter {
    /// Create a new in-memory adapter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe a stored artifact, if present.
    pub fn artifact_info(&self, artifact_id: &str) -> Option<ArtifactInfo> {
        self.artifacts
            .read()
            .unwrap()
            .get(artifact_id)
            .map(|a| ArtifactInfo {
                mime_type: a.mime_type.clone(),
                name: a.name.clone(),
                collection_name: a.collection_name.clone(),
                metadata: a.metadata.clone(),
                size: a.data.len() as u64,
            })
    }
}

#[async_trait]
impl IoAdapter for InMemoryAdapter {
    async fn read_artifact(
        &self,
        artifact_id: &str,
        opts: ReadOptions,
    ) -> Result<Box<dyn Readable>> {
        let artifacts = self.artifacts.read().unwrap();
        let artifact = artifacts
            .get(artifact_id)
            .ok_or_else(|| Error::NotFound(artifact_id.to_string()))?;
        Ok(Box::new(BufferReader::new(
            artifact_id,
            Mode::read(opts.binary_content),
            artifact.data.clone(),
        )))
    }

    async fn read_external(&self, url: &Url, opts: ReadOptions) -> Result<Box<dyn Readable>> {
        // Buffered in memory either way, so the seekable flag costs nothing.
        let mut sink = BufferSink::new(url.as_str());
        download(&self.http, url, &mut sink, DownloadOptions::default()).await?;
        Ok(Box::new(BufferReader::new(
            url.as_str(),
            Mode::read(opts.binary_content),
            sink.into_bytes(),
        )))
    }

    async fn artifact_readable(&self, artifact_id: &str) -> bool {
        self.artifacts.read().unwrap().contains_key(artifact_id)
    }

    async fn write_artifact(
        &self,
        mime_type: &str,
        opts: WriteOptions,
    ) -> Result<Box<dyn Writable>> {
        validate_mime_type(mime_type)?;
        Ok(Box::new(MemoryWriter {
            name: opts.name.clone().unwrap_or_else(|| "artifact".to_string()),
            mime_type: mime_type.to_string(),
            display_name: opts.name,
            collection_name: opts.collection_name,
            metadata: opts.metadata,
            on_close: opts.on_close,
            buf: Cursor::new(Vec::new()),
            store: Arc::clone(&self.artifacts),
            closed: false,
        }))
    }
}

/// Writer that persists into the adapter's store when closed.
struct MemoryWriter {
    name: String,
    mime_type: String,
    display_name: Option<String>,
    collection_name: Option<String>,
    metadata: Vec<MetaMap>,
    on_close: Option<OnClose>,
    buf: Cursor<Vec<u8>>,
    store: Store,
    closed: bool,
}

impl AsyncWrite for MemoryWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.closed {
            return Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("stream '{}' is closed", this.name),
            )));
        }
        Poll::Ready(io::Write::write(&mut this.buf, buf))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

#[async_trait]
impl Writable for MemoryWriter {
    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> Mode {
        Mode::WriteBinary
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn seekable(&self) -> bool {
        true
    }

    async fn seek(&mut self, pos: std::io::SeekFrom) -> Result<u64> {
        if self.closed {
            return Err(Error::Closed(self.name.clone()));
        }
        Ok(io::Seek::seek(&mut self.buf, pos)?)
    }

    async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        let artifact_id = format!("urn:ivcap:artifact:{}", Uuid::new_v4());
        let artifact = StoredArtifact {
            mime_type: mem::take(&mut self.mime_type),
            name: self.display_name.take(),
            collection_name: self.collection_name.take(),
            metadata: mem::take(&mut self.metadata),
            data: mem::take(self.buf.get_mut()),
        };
        let size = artifact.data.len();
        self.store
            .write()
            .unwrap()
            .insert(artifact_id.clone(), artifact);
        self.closed = true;
        debug!(target: TRACING_TARGET, artifact_id = %artifact_id, bytes = size, "artifact persisted");

        if let Some(on_close) = self.on_close.take() {
            on_close(&artifact_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Write `data` as a new artifact and return the assigned ID.
    async fn write_artifact(adapter: &InMemoryAdapter, mime_type: &str, data: &[u8]) -> String {
        let assigned = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&assigned);
        let mut writer = adapter
            .write_artifact(
                mime_type,
                WriteOptions::new().on_close(move |id| {
                    *seen.lock().unwrap() = Some(id.to_string());
                }),
            )
            .await
            .unwrap();
        writer.write_all(data).await.unwrap();
        writer.close().await.unwrap();
        let id = assigned.lock().unwrap().take().unwrap();
        id
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let adapter = InMemoryAdapter::new();
        let id = write_artifact(&adapter, "text/plain", b"some observations").await;

        assert!(adapter.artifact_readable(&id).await);
        let info = adapter.artifact_info(&id).unwrap();
        assert_eq!(info.mime_type, "text/plain");
        assert_eq!(info.size, b"some observations".len() as u64);

        let mut readable = adapter
            .read_artifact(&id, ReadOptions::default())
            .await
            .unwrap();
        let mut content = Vec::new();
        readable.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"some observations");
    }

    #[tokio::test]
    async fn test_unclosed_writer_leaves_no_artifact() {
        let adapter = InMemoryAdapter::new();
        let observed = Arc::new(Mutex::new(Vec::<String>::new()));
        let seen = Arc::clone(&observed);
        {
            let mut writer = adapter
                .write_artifact(
                    "text/plain",
                    WriteOptions::new().on_close(move |id| seen.lock().unwrap().push(id.to_string())),
                )
                .await
                .unwrap();
            writer.write_all(b"never finished").await.unwrap();
            // dropped without close
        }
        assert!(observed.lock().unwrap().is_empty());
        assert!(adapter.artifacts.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_on_close_runs_exactly_once() {
        let adapter = InMemoryAdapter::new();
        let calls = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&calls);
        let mut writer = adapter
            .write_artifact(
                "application/json",
                WriteOptions::new().on_close(move |_| *counter.lock().unwrap() += 1),
            )
            .await
            .unwrap();
        writer.write_all(b"{}").await.unwrap();
        writer.close().await.unwrap();
        writer.close().await.unwrap();
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_closed_writer_rejects_writes() {
        let adapter = InMemoryAdapter::new();
        let mut writer = adapter
            .write_artifact("text/plain", WriteOptions::new())
            .await
            .unwrap();
        writer.close().await.unwrap();
        assert!(writer.write_all(b"late").await.is_err());
    }

    #[tokio::test]
    async fn test_read_missing_artifact() {
        let adapter = InMemoryAdapter::new();
        let err = adapter
            .read_artifact("urn:ivcap:artifact:nope", ReadOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        // The probe never raises.
        assert!(!adapter.artifact_readable("urn:ivcap:artifact:nope").await);
    }

    #[tokio::test]
    async fn test_seekable_request_honored() {
        let adapter = InMemoryAdapter::new();
        let id = write_artifact(&adapter, "application/octet-stream", b"0123456789").await;

        let readable = adapter
            .read_artifact(&id, ReadOptions::default().seekable())
            .await
            .unwrap();
        assert!(readable.seekable());
    }

    #[tokio::test]
    async fn test_invalid_mime_type_rejected() {
        let adapter = InMemoryAdapter::new();
        let err = adapter
            .write_artifact("not-a-mime", WriteOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_empty_artifact_round_trip() {
        let adapter = InMemoryAdapter::new();
        let id = write_artifact(&adapter, "text/plain", b"").await;

        let mut readable = adapter
            .read_artifact(&id, ReadOptions::default())
            .await
            .unwrap();
        let mut content = Vec::new();
        readable.read_to_end(&mut content).await.unwrap();
        assert!(content.is_empty());
    }
}
