//! Capability traits for streaming byte handles.
//!
//! `Readable` and `Writable` are independent capabilities over tokio's
//! `AsyncRead`/`AsyncWrite`; a handle supporting both simply implements
//! both traits. Each handle knows its name, its mode, whether it has been
//! closed and whether it supports random access. Once a handle is closed,
//! every further read, write or seek fails.

use std::fmt;
use std::io::{self, Cursor, SeekFrom};
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncSeekExt, AsyncWrite, AsyncWriteExt, ReadBuf};

use crate::error::{Error, Result};

/// Open mode of a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ReadBinary,
    ReadText,
    WriteBinary,
    WriteText,
}

impl Mode {
    /// Read mode for binary or text content.
    pub fn read(binary: bool) -> Self {
        if binary { Mode::ReadBinary } else { Mode::ReadText }
    }

    /// Write mode for binary or text content.
    pub fn write(binary: bool) -> Self {
        if binary { Mode::WriteBinary } else { Mode::WriteText }
    }

    pub fn is_read(&self) -> bool {
        matches!(self, Mode::ReadBinary | Mode::ReadText)
    }

    pub fn is_write(&self) -> bool {
        !self.is_read()
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Mode::ReadBinary | Mode::WriteBinary)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = match self {
            Mode::ReadBinary => "rb",
            Mode::ReadText => "r",
            Mode::WriteBinary => "wb",
            Mode::WriteText => "w",
        };
        f.write_str(mode)
    }
}

/// A named, streamable byte source.
#[async_trait]
pub trait Readable: AsyncRead + Send + Unpin {
    /// Name of the underlying object (artifact ID, URL, or path)
    fn name(&self) -> &str;

    /// Mode the handle was opened with
    fn mode(&self) -> Mode;

    /// True once [`close`](Readable::close) has been called
    fn is_closed(&self) -> bool;

    /// True if the handle supports random access
    fn seekable(&self) -> bool;

    /// Reposition the read cursor, returning the new position.
    async fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Release the handle. Closing twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}

impl fmt::Debug for dyn Readable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Readable")
            .field("name", &self.name())
            .field("mode", &self.mode())
            .finish()
    }
}

/// A named, streamable byte sink.
///
/// For artifact writers, `close` is the persistence point: content only
/// becomes durable (and the artifact ID assigned) when the handle is
/// closed. Callers must close on every exit path or the write is lost.
#[async_trait]
pub trait Writable: AsyncWrite + Send + Unpin {
    /// Name of the underlying object
    fn name(&self) -> &str;

    /// Mode the handle was opened with
    fn mode(&self) -> Mode;

    /// True once [`close`](Writable::close) has been called
    fn is_closed(&self) -> bool;

    /// True if the handle supports random access
    fn seekable(&self) -> bool;

    /// Reposition the write cursor, returning the new position.
    async fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Flush and finalize the handle. Closing twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}

impl fmt::Debug for dyn Writable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writable")
            .field("name", &self.name())
            .field("mode", &self.mode())
            .finish()
    }
}

fn closed_io_error(name: &str) -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, format!("stream '{name}' is closed"))
}

/// Growable in-memory sink, seekable from the start.
#[derive(Debug, Default)]
pub struct BufferSink {
    name: String,
    buf: Cursor<Vec<u8>>,
    closed: bool,
}

impl BufferSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buf: Cursor::new(Vec::new()),
            closed: false,
        }
    }

    /// Bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        self.buf.get_ref()
    }

    /// Consume the sink, yielding the accumulated bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.into_inner()
    }
}

impl AsyncWrite for BufferSink {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        if this.closed {
            return Poll::Ready(Err(closed_io_error(&this.name)));
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
impl Writable for BufferSink {
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
        if self.closed {
            return Err(Error::Closed(self.name.clone()));
        }
        Ok(io::Seek::seek(&mut self.buf, pos)?)
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Sink writing straight to a local file.
#[derive(Debug)]
pub struct FileSink {
    name: String,
    file: Option<File>,
}

impl FileSink {
    /// Create (or truncate) the file at `path`.
    pub async fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).await?;
        Ok(Self {
            name: path.display().to_string(),
            file: Some(file),
        })
    }

    /// Wrap an already open file under a caller-chosen name.
    pub fn from_file(name: impl Into<String>, file: File) -> Self {
        Self {
            name: name.into(),
            file: Some(file),
        }
    }
}

impl AsyncWrite for FileSink {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        match this.file.as_mut() {
            Some(file) => Pin::new(file).poll_write(cx, buf),
            None => Poll::Ready(Err(closed_io_error(&this.name))),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        match this.file.as_mut() {
            Some(file) => Pin::new(file).poll_flush(cx),
            None => Poll::Ready(Err(closed_io_error(&this.name))),
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
impl Writable for FileSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> Mode {
        Mode::WriteBinary
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
        if let Some(mut file) = self.file.take() {
            file.shutdown().await?;
        }
        Ok(())
    }
}

/// Cursor-backed reader over bytes held in memory.
///
/// Always seekable; used by the in-memory adapter and for replaying
/// downloaded content.
#[derive(Debug)]
pub struct BufferReader {
    name: String,
    mode: Mode,
    cursor: Cursor<Vec<u8>>,
    closed: bool,
}

impl BufferReader {
    pub fn new(name: impl Into<String>, mode: Mode, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mode,
            cursor: Cursor::new(data),
            closed: false,
        }
    }
}

impl AsyncRead for BufferReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        if this.closed {
            return Poll::Ready(Err(closed_io_error(&this.name)));
        }
        Pin::new(&mut this.cursor).poll_read(cx, buf)
    }
}

#[async_trait]
impl Readable for BufferReader {
    fn name(&self) -> &str {
        &self.name
    }

    fn mode(&self) -> Mode {
        self.mode
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn seekable(&self) -> bool {
        true
    }

    async fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        if self.closed {
            return Err(Error::Closed(self.name.clone()));
        }
        Ok(io::Seek::seek(&mut self.cursor, pos)?)
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
