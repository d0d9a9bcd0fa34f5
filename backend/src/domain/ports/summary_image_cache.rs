//! Driven port for the rendered summary image cache.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image cache adapters.
    pub enum SummaryImageCacheError {
        /// Reading, writing or removing a cached image failed.
        Io { message: String } =>
            "summary image cache i/o failed: {message}",
    }
}

/// Port for storing PNG bytes keyed by data version.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummaryImageCache: Send + Sync {
    /// Cached image for `version`, if present.
    async fn load(&self, version: &str) -> Result<Option<Vec<u8>>, SummaryImageCacheError>;

    /// Store `png` for `version`. Readers never observe a partial file.
    async fn store(&self, version: &str, png: &[u8]) -> Result<(), SummaryImageCacheError>;

    /// Drop every cached image.
    async fn invalidate(&self) -> Result<(), SummaryImageCacheError>;
}

/// Fixture cache that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSummaryImageCache;

#[async_trait]
impl SummaryImageCache for FixtureSummaryImageCache {
    async fn load(&self, _version: &str) -> Result<Option<Vec<u8>>, SummaryImageCacheError> {
        Ok(None)
    }

    async fn store(&self, _version: &str, _png: &[u8]) -> Result<(), SummaryImageCacheError> {
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), SummaryImageCacheError> {
        Ok(())
    }
}
