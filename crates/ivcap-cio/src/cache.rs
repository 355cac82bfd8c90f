//! Local cache extension point.
//!
//! Adapters consult an optional cache keyed by artifact ID or URL and honor
//! the `no_caching` read option. No backend is wired up yet, so
//! [`create_cache`] returns `None` and every lookup is a miss; a real
//! backend must also define its own fill/eviction discipline before it can
//! be plugged in here.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::error::Result;
use crate::stream::Readable;

/// A local store mapping artifact IDs or URLs to cached byte streams.
#[async_trait]
pub trait ArtifactCache: Send + Sync {
    /// Look up a cached entry; `None` is a miss.
    async fn get(&self, key: &str) -> Option<Box<dyn Readable>>;

    /// Record content under a key.
    async fn put(&self, key: &str, data: &[u8]) -> Result<()>;
}

/// Create the cache for an adapter.
///
/// `cache_dir` is the directory root a disk-backed cache would use and
/// `proxy_url` the endpoint a cache miss would be fetched through.
pub fn create_cache(_cache_dir: &Path, _proxy_url: Option<&Url>) -> Option<Arc<dyn ArtifactCache>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cache_backend_configured() {
        assert!(create_cache(Path::new("/tmp/cache"), None).is_none());
    }
}
