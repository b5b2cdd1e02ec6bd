use crate::error::CacheError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A bounded, in-process cache for URL records.
///
/// The cache is never authoritative. Implementations must be safe to share
/// between tasks and must never hold more entries than their capacity.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Get URL record from cache.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Store URL record in cache unless the code is already cached.
    ///
    /// An existing entry is kept as is, so cached click counts are never
    /// reset. Returns `Ok(false)` when the cache declined to hold the record.
    async fn insert(&self, record: &UrlRecord) -> Result<bool>;

    /// Add one click to a cached record and return the updated record.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Number of entries currently held.
    fn len(&self) -> usize;

    /// Whether the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
