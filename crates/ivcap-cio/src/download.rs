//! Streaming HTTP download into a byte sink.

use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::stream::Writable;
use tokio::io::AsyncWriteExt;

/// Tracing target for download operations.
pub const TRACING_TARGET: &str = "ivcap_cio::download";

/// Options for [`download`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadOptions {
    /// Upper bound for individual writes to the sink; network-chosen chunk
    /// sizes are used when unset
    pub chunk_size: Option<usize>,
    /// Leave the sink open after a successful transfer
    pub keep_open: bool,
}

impl DownloadOptions {
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    pub fn keep_open(mut self) -> Self {
        self.keep_open = true;
        self
    }
}

/// Stream the body of `url` into `sink` without buffering it whole.
///
/// A non-success status fails with [`Error::Transport`] before any byte is
/// written. On success the sink is flushed after the last chunk and, unless
/// [`DownloadOptions::keep_open`] was set, closed. A zero-length body is a
/// valid success.
///
/// The HTTP response is scoped to this call and released on every exit
/// path. Bytes already written before a mid-stream failure are not rolled
/// back; cleaning up a partial destination is the caller's concern.
pub async fn download<W>(
    client: &reqwest::Client,
    url: &Url,
    sink: &mut W,
    opts: DownloadOptions,
) -> Result<()>
where
    W: Writable + ?Sized,
{
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| Error::transport(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        // Dropping the response here releases the connection.
        return Err(Error::transport(url, format!("unexpected status {status}")));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    debug!(
        target: TRACING_TARGET,
        url = %url,
        status = status.as_u16(),
        content_type = content_type.as_deref(),
        "streaming response body"
    );

    let mut response = response;
    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| Error::transport(url, &e))?
    {
        match opts.chunk_size {
            Some(size) if size > 0 => {
                for part in chunk.chunks(size) {
                    sink.write_all(part).await?;
                }
            }
            _ => sink.write_all(&chunk).await?,
        }
        written += chunk.len() as u64;
    }

    sink.flush().await?;
    if !opts.keep_open {
        sink.close().await?;
    }
    debug!(target: TRACING_TARGET, url = %url, bytes = written, "download complete");
    Ok(())
}
