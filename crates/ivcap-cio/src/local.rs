//! Directory-rooted artifact I/O adapter.
//!
//! Stores each artifact as a payload file plus a JSON sidecar under the
//! adapter's root directory:
//!
//! ```text
//! root/<safe-id>.data     payload bytes
//! root/<safe-id>.json     mime type, name, collection, metadata
//! root/partial/<token>    in-flight writes, invisible until closed
//! root/downloads/<token>  materialized external fetches
//! ```
//!
//! External reads always materialize to a file under `downloads/`, so the
//! returned handle supports seeking whether or not it was requested.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs::{self, File};
use tokio::io::{AsyncRead, AsyncSeekExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::adapter::{
    ArtifactInfo, IoAdapter, MetaMap, OnClose, ReadOptions, WriteOptions, validate_mime_type,
};
use crate::cache::{ArtifactCache, create_cache};
use crate::download::{DownloadOptions, download};
use crate::error::{Error, Result};
use crate::stream::{FileSink, Mode, Readable, Writable};

/// Tracing target for the local adapter.
pub const TRACING_TARGET: &str = "ivcap_cio::local";

/// Sidecar record stored next to each payload file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Sidecar {
    mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    collection_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    metadata: Vec<MetaMap>,
}

/// Artifact I/O adapter backed by a local directory.
#[derive(Clone)]
pub struct LocalAdapter {
    root: PathBuf,
    http: reqwest::Client,
    cache: Option<Arc<dyn ArtifactCache>>,
}

impl LocalAdapter {
    /// Create an adapter rooted at `root`. The directory is created lazily
    /// on first write or download.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let cache = create_cache(&root.join("cache"), None);
        Self {
            root,
            http: reqwest::Client::new(),
            cache,
        }
    }

    fn data_path(&self, artifact_id: &str) -> PathBuf {
        self.root.join(format!("{}.data", sanitize(artifact_id)))
    }

    fn sidecar_path(&self, artifact_id: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize(artifact_id)))
    }

    /// Describe a stored artifact, if present.
    pub async fn artifact_info(&self, artifact_id: &str) -> Option<ArtifactInfo> {
        let raw = fs::read(self.sidecar_path(artifact_id)).await.ok()?;
        let sidecar: Sidecar = serde_json::from_slice(&raw).ok()?;
        let size = fs::metadata(self.data_path(artifact_id)).await.ok()?.len();
        Some(ArtifactInfo {
            mime_type: sidecar.mime_type,
            name: sidecar.name,
            collection_name: sidecar.collection_name,
            metadata: sidecar.metadata,
            size,
        })
    }

    async fn open_payload(&self, artifact_id: &str) -> Result<File> {
        match File::open(self.data_path(artifact_id)).await {
            Ok(file) => Ok(file),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(Error::NotFound(artifact_id.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(Error::PermissionDenied(artifact_id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl IoAdapter for LocalAdapter {
    async fn read_artifact(
        &self,
        artifact_id: &str,
        opts: ReadOptions,
    ) -> Result<Box<dyn Readable>> {
        if !opts.no_caching
            && let Some(cache) = &self.cache
            && let Some(hit) = cache.get(artifact_id).await
        {
            return Ok(hit);
        }

        let raw = match fs::read(self.sidecar_path(artifact_id)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::NotFound(artifact_id.to_string()));
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                return Err(Error::PermissionDenied(artifact_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        // Reject artifacts whose sidecar no longer parses.
        let _sidecar: Sidecar = serde_json::from_slice(&raw)?;

        let file = self.open_payload(artifact_id).await?;
        Ok(Box::new(FileReader::new(
            artifact_id,
            Mode::read(opts.binary_content),
            file,
        )))
    }

    async fn read_external(&self, url: &Url, opts: ReadOptions) -> Result<Box<dyn Readable>> {
        if !opts.no_caching
            && let Some(cache) = &self.cache
            && let Some(hit) = cache.get(url.as_str()).await
        {
            return Ok(hit);
        }

        let dir = self.root.join("downloads");
        fs::create_dir_all(&dir).await?;
        let path = dir.join(Uuid::new_v4().to_string());

        let mut sink = FileSink::create(&path).await?;
        if let Err(e) = download(&self.http, url, &mut sink, DownloadOptions::default()).await {
            drop(sink);
            let _ = fs::remove_file(&path).await;
            return Err(e);
        }

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) => {
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }
        };
        Ok(Box::new(FileReader::owning(
            url.as_str(),
            Mode::read(opts.binary_content),
            file,
            path,
        )))
    }

    async fn artifact_readable(&self, artifact_id: &str) -> bool {
        let sidecar = fs::try_exists(self.sidecar_path(artifact_id))
            .await
            .unwrap_or(false);
        let payload = fs::try_exists(self.data_path(artifact_id))
            .await
            .unwrap_or(false);
        sidecar && payload
    }

    async fn write_artifact(
        &self,
        mime_type: &str,
        opts: WriteOptions,
    ) -> Result<Box<dyn Writable>> {
        validate_mime_type(mime_type)?;

        let partial_dir = self.root.join("partial");
        fs::create_dir_all(&partial_dir).await?;
        let partial_path = partial_dir.join(Uuid::new_v4().to_string());
        let file = File::create(&partial_path).await?;

        Ok(Box::new(LocalWriter {
            name: opts
                .name
                .clone()
                .unwrap_or_else(|| partial_path.display().to_string()),
            sidecar: Sidecar {
                mime_type: mime_type.to_string(),
                name: opts.name,
                collection_name: opts.collection_name,
                metadata: opts.metadata,
            },
            on_close: opts.on_close,
            root: self.root.clone(),
            partial_path,
            file: Some(file),
            closed: false,
        }))
    }
}

/// Replace path-hostile characters in an artifact ID.
fn sanitize(artifact_id: &str) -> String {
    artifact_id.replace(['/', '\\', ':'], "_")
}

/// Seekable reader over a payload or downloaded file.
///
/// A reader over a download scratch file owns that file and removes it
/// once the handle is closed or dropped; payload readers leave the
/// artifact in place.
struct FileReader {
    name: String,
    mode: Mode,
    file: Option<File>,
    owned_path: Option<PathBuf>,
}

impl FileReader {
    fn new(name: impl Into<String>, mode: Mode, file: File) -> Self {
        Self {
            name: name.into(),
            mode,
            file: Some(file),
            owned_path: None,
        }
    }

    /// Reader over a scratch file that should not outlive the handle.
    fn owning(name: impl Into<String>, mode: Mode, file: File, path: PathBuf) -> Self {
        let mut reader = Self::new(name, mode, file);
        reader.owned_path = Some(path);
        reader
    }
}

impl Drop for FileReader {
    fn drop(&mut self) {
        self.file.take();
        if let Some(path) = self.owned_path.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

impl AsyncRead for FileReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match this.file.as_mut() {
            Some(file) => Pin::new(file).poll_read(cx, buf),
            None => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("stream '{}' is closed", this.name),
            ))),
        }
    }
}

#[async_trait]
impl Readable for FileReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    fn seekable(&self) -> bool {
        true
    }

    async fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        match self.file.as_mut() {
            Some(file) => Ok(file.seek(pos).await?),
            None => Err(Error::Closed(self.name.clone())),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.file.take();
        if let Some(path) = self.owned_path.take() {
            let _ = fs::remove_file(path).await;
        }
        Ok(())
    }
}

/// Writer that moves its payload into place and writes the sidecar when
/// closed. An unclosed writer leaves only a stray file under `partial/`.
struct LocalWriter {
    name: String,
    sidecar: Sidecar,
    on_close: Option<OnClose>,
    root: PathBuf,
    partial_path: PathBuf,
    file: Option<File>,
    closed: bool,
}

impl AsyncWrite for LocalWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        match this.file.as_mut() {
            Some(file) => Pin::new(file).poll_write(cx, buf),
            None => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                format!("stream '{}' is closed", this.name),
            ))),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match this.file.as_mut() {
            Some(file) => Pin::new(file).poll_flush(cx),
            None => Poll::Ready(Ok(())),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match this.file.as_mut() {
            Some(file) => Pin::new(file).poll_shutdown(cx),
            None => Poll::Ready(Ok(())),
        }
    }
}

#[async_trait]
impl Writable for LocalWriter {
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

    async fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        match self.file.as_mut() {
            Some(file) => Ok(file.seek(pos).await?),
            None => Err(Error::Closed(self.name.clone())),
        }
    }

    async fn close(&mut self) -> Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        file.shutdown().await?;
        drop(file);

        let artifact_id = format!("urn:ivcap:artifact:{}", Uuid::new_v4());
        let safe = sanitize(&artifact_id);
        let data_path = self.root.join(format!("{safe}.data"));
        let sidecar_path = self.root.join(format!("{safe}.json"));

        // Payload first; the artifact only becomes visible once the
        // sidecar lands.
        fs::rename(&self.partial_path, &data_path).await?;
        fs::write(&sidecar_path, serde_json::to_vec_pretty(&self.sidecar)?).await?;
        self.closed = true;
        debug!(target: TRACING_TARGET, artifact_id = %artifact_id, path = %data_path.display(), "artifact persisted");

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

    fn adapter() -> (tempfile::TempDir, LocalAdapter) {
        let dir = tempfile::tempdir().unwrap();
        let adapter = LocalAdapter::new(dir.path());
        (dir, adapter)
    }

    async fn write_artifact(
        adapter: &LocalAdapter,
        mime_type: &str,
        opts: WriteOptions,
        data: &[u8],
    ) -> String {
        let assigned = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&assigned);
        let mut writer = adapter
            .write_artifact(
                mime_type,
                opts.on_close(move |id| {
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
        let (_dir, adapter) = adapter();
        let mut meta = MetaMap::new();
        meta.insert("schema".to_string(), "urn:example:scan".to_string());
        let opts = WriteOptions::new()
            .with_name("scan.bin")
            .with_collection("scans")
            .with_metadata(meta);

        let id = write_artifact(&adapter, "application/octet-stream", opts, b"payload bytes").await;
        assert!(adapter.artifact_readable(&id).await);

        let info = adapter.artifact_info(&id).await.unwrap();
        assert_eq!(info.mime_type, "application/octet-stream");
        assert_eq!(info.name.as_deref(), Some("scan.bin"));
        assert_eq!(info.collection_name.as_deref(), Some("scans"));
        assert_eq!(info.metadata[0]["schema"], "urn:example:scan");
        assert_eq!(info.size, b"payload bytes".len() as u64);

        let mut readable = adapter
            .read_artifact(&id, ReadOptions::default())
            .await
            .unwrap();
        let mut content = Vec::new();
        readable.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"payload bytes");
    }

    #[tokio::test]
    async fn test_file_handles_are_seekable() {
        let (_dir, adapter) = adapter();
        let id = write_artifact(
            &adapter,
            "application/octet-stream",
            WriteOptions::new(),
            b"0123456789",
        )
        .await;

        let mut readable = adapter
            .read_artifact(&id, ReadOptions::default().seekable())
            .await
            .unwrap();
        assert!(readable.seekable());
        readable.seek(SeekFrom::Start(6)).await.unwrap();
        let mut tail = Vec::new();
        readable.read_to_end(&mut tail).await.unwrap();
        assert_eq!(tail, b"6789");
    }

    #[tokio::test]
    async fn test_seekable_writer_backfills_header() {
        let (_dir, adapter) = adapter();
        let assigned = Arc::new(Mutex::new(None));
        let seen = Arc::clone(&assigned);
        let mut writer = adapter
            .write_artifact(
                "application/octet-stream",
                WriteOptions::new().seekable().on_close(move |id| {
                    *seen.lock().unwrap() = Some(id.to_string());
                }),
            )
            .await
            .unwrap();
        assert!(writer.seekable());

        // Reserve a header, write the body, then come back for the header.
        writer.write_all(&[0u8; 4]).await.unwrap();
        writer.write_all(b"body").await.unwrap();
        writer.seek(SeekFrom::Start(0)).await.unwrap();
        writer.write_all(b"HDR!").await.unwrap();
        writer.close().await.unwrap();

        let id = assigned.lock().unwrap().take().unwrap();
        let mut readable = adapter
            .read_artifact(&id, ReadOptions::default())
            .await
            .unwrap();
        let mut content = Vec::new();
        readable.read_to_end(&mut content).await.unwrap();
        assert_eq!(content, b"HDR!body");
    }

    #[tokio::test]
    async fn test_unclosed_writer_leaves_no_artifact() {
        let (dir, adapter) = adapter();
        {
            let mut writer = adapter
                .write_artifact("text/plain", WriteOptions::new())
                .await
                .unwrap();
            writer.write_all(b"abandoned").await.unwrap();
            // dropped without close
        }
        // Nothing outside partial/ became visible.
        let mut entries = fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            assert_eq!(entry.file_name(), "partial");
        }
    }

    #[tokio::test]
    async fn test_read_missing_artifact() {
        let (_dir, adapter) = adapter();
        let err = adapter
            .read_artifact("urn:ivcap:artifact:missing", ReadOptions::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!adapter.artifact_readable("urn:ivcap:artifact:missing").await);
    }

    #[tokio::test]
    async fn test_corrupt_sidecar_is_malformed_metadata() {
        let (_dir, adapter) = adapter();
        let id = write_artifact(&adapter, "text/plain", WriteOptions::new(), b"x").await;
        fs::write(adapter.sidecar_path(&id), b"{ not json").await.unwrap();

        let err = adapter
            .read_artifact(&id, ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
