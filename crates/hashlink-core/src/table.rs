use crate::error::StorageError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for durable table operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Outcome of a conditional insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    /// No record existed under the key; the new one was written.
    Inserted,
    /// A record already existed under the key and was left untouched.
    AlreadyExists,
}

/// The authoritative key-value table behind the cache.
///
/// Implementations must serialize conditional puts and increments on the
/// same key, so that concurrent callers observe exactly one insert and no
/// lost click updates.
#[async_trait]
pub trait DurableTable: Send + Sync + 'static {
    /// Inserts `record` only if nothing is stored under its short code.
    async fn conditional_put(&self, record: &UrlRecord) -> Result<PutOutcome>;

    /// Retrieves the record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Atomically adds `delta` to the click counter and returns the new value.
    /// Returns `None` if the code does not exist.
    async fn increment_clicks(&self, code: &ShortCode, delta: u64) -> Result<Option<u64>>;
}

/// A shared table, so the store and the cache tier can write to the same
/// backend.
#[async_trait]
impl<T: DurableTable + ?Sized> DurableTable for Arc<T> {
    async fn conditional_put(&self, record: &UrlRecord) -> Result<PutOutcome> {
        (**self).conditional_put(record).await
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        (**self).get(code).await
    }

    async fn increment_clicks(&self, code: &ShortCode, delta: u64) -> Result<Option<u64>> {
        (**self).increment_clicks(code, delta).await
    }
}
