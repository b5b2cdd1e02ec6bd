use async_trait::async_trait;
use hashlink_core::cache::Result;
use hashlink_core::{DurableTable, ShortCode, UrlCache, UrlRecord};
use moka::future::Cache;
use moka::notification::{ListenerFuture, RemovalCause};
use moka::ops::compute::{CompResult, Op};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// An in-memory cache implementation using Moka.
///
/// Unlike [`BoundedUrlCache`](crate::BoundedUrlCache), this cache never
/// refuses a record outright: once `max_capacity` is reached, Moka evicts the
/// entries least likely to be used again, and may decline to admit a new one.
///
/// Clicks counted in the cache are not in the durable table yet. When the
/// cache is built with a write-back table, an evicted or expired record's
/// cached clicks are added to the durable counter, so its click total never
/// goes backwards. Without one they are lost on eviction.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<ShortCode, CachedRecord>,
}

#[derive(Debug, Clone)]
struct CachedRecord {
    record: UrlRecord,
    /// Clicks the durable table already holds.
    synced_clicks: u64,
}

impl CachedRecord {
    fn new(record: &UrlRecord) -> Self {
        Self {
            record: record.clone(),
            synced_clicks: record.clicks,
        }
    }

    fn unsynced_clicks(&self) -> u64 {
        self.record.clicks.saturating_sub(self.synced_clicks)
    }
}

impl MokaUrlCache {
    /// Creates a new Moka URL cache with default settings.
    ///
    /// The cache will have a default maximum capacity of 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Creates a new Moka URL cache with a custom maximum capacity.
    pub fn with_capacity(max_capacity: u64) -> Self {
        CacheConfig::builder()
            .max_capacity(max_capacity)
            .build()
            .into()
    }

    /// Creates a cache that adds the cached clicks of every evicted record
    /// to `table`.
    pub fn with_write_back(max_capacity: u64, table: Arc<dyn DurableTable>) -> Self {
        CacheConfig::builder()
            .max_capacity(max_capacity)
            .write_back(table)
            .build()
            .into()
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }

    /// Applies pending evictions. Entry counts are only exact afterwards.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        trace!(code = %code, "Fetching URL record from Moka cache");

        match self.cache.get(code).await {
            Some(cached) => {
                debug!(code = %code, "Cache hit in Moka");
                Ok(Some(cached.record))
            }
            None => {
                trace!(code = %code, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn insert(&self, record: &UrlRecord) -> Result<bool> {
        trace!(code = %record.short_code, "Storing URL record in Moka cache");

        let entry = self
            .cache
            .entry(record.short_code.clone())
            .or_insert(CachedRecord::new(record))
            .await;
        if !entry.is_fresh() {
            return Ok(true);
        }

        // Admission is decided during maintenance, so a fresh entry may be
        // dropped right away.
        self.cache.run_pending_tasks().await;
        let kept = self.cache.contains_key(&record.short_code);
        if kept {
            debug!(code = %record.short_code, "Cached record in Moka");
        } else {
            debug!(code = %record.short_code, "Moka declined to admit record");
        }
        Ok(kept)
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let result = self
            .cache
            .entry_by_ref(code)
            .and_compute_with(|maybe_entry| {
                let op = match maybe_entry {
                    Some(entry) => {
                        let mut cached = entry.into_value();
                        cached.record.clicks = cached.record.clicks.saturating_add(1);
                        Op::Put(cached)
                    }
                    None => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        match result {
            CompResult::Inserted(entry) | CompResult::ReplacedWith(entry) => {
                Ok(Some(entry.into_value().record))
            }
            _ => Ok(None),
        }
    }

    fn len(&self) -> usize {
        self.cache.entry_count() as usize
    }
}

/// Adds the cached clicks of an evicted record to the durable counter.
fn write_back(
    table: Arc<dyn DurableTable>,
    code: Arc<ShortCode>,
    cached: CachedRecord,
    cause: RemovalCause,
) -> ListenerFuture {
    Box::pin(async move {
        // Replaced entries live on under the same key.
        let clicks = cached.unsynced_clicks();
        if !cause.was_evicted() || clicks == 0 {
            return;
        }

        match table.increment_clicks(&code, clicks).await {
            Ok(Some(total)) => {
                debug!(code = %code, clicks, total, "Wrote back cached clicks of evicted record")
            }
            Ok(None) => {
                debug!(code = %code, clicks, "Evicted record is not stored durably, dropping its clicks")
            }
            Err(e) => {
                warn!(code = %code, clicks, error = %e, "Failed to write back cached clicks")
            }
        }
    })
}

/// Configuration for creating a MokaUrlCache with custom settings.
#[derive(TypedBuilder, Default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    max_capacity: Option<u64>,
    /// Time-to-idle for cache entries.
    #[builder(default, setter(strip_option))]
    tti: Option<Duration>,
    /// Durable table that receives the cached clicks of evicted records.
    #[builder(default, setter(strip_option))]
    write_back: Option<Arc<dyn DurableTable>>,
}

impl From<CacheConfig> for MokaUrlCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::<ShortCode, CachedRecord>::builder();

        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        if let Some(table) = config.write_back {
            builder = builder.async_eviction_listener(move |code, cached, cause| {
                write_back(Arc::clone(&table), code, cached, cause)
            });
        }

        MokaUrlCache {
            cache: builder.build(),
        }
    }
}
