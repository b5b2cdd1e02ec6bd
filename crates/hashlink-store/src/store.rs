use crate::normalize::normalize_url;
use crate::settings::{ConfiguredCache, StoreSettings};
use async_trait::async_trait;
use hashlink_core::{
    CreateOutcome, Created, DurableTable, Lookup, PutOutcome, ShortCode, Shortener, UrlCache,
    UrlRecord,
};
use hashlink_generator::{Generator, Sha256Generator};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// A two-tier URL store: a bounded in-process cache in front of a durable
/// table.
///
/// The durable table is the source of truth. The cache answers reads when
/// it can and counts clicks for the records it holds. Those cache-only
/// counts reach the durable table only when an evicting cache drops the
/// record, so separate store instances may report different click totals
/// for the same code.
///
/// When the durable table cannot be reached, `create` falls back to the
/// cache alone and reports [`CreateOutcome::Degraded`], and lookups that
/// miss the cache report [`Lookup::Unavailable`].
///
/// # Example
///
/// ```rust
/// use hashlink_cache::BoundedUrlCache;
/// use hashlink_core::Shortener;
/// use hashlink_storage::InMemoryTable;
/// use hashlink_store::UrlStore;
///
/// # async fn example() {
/// let store = UrlStore::new(InMemoryTable::new(), BoundedUrlCache::with_capacity(1_000));
///
/// let created = store.create("example.com/long").await;
/// let url = store.resolve(created.short_code.as_str()).await.found();
/// assert_eq!(url.as_deref(), Some("https://example.com/long"));
/// # }
/// ```
#[derive(Debug)]
pub struct UrlStore<T, C, G = Sha256Generator> {
    table: T,
    cache: C,
    generator: G,
}

impl<T: DurableTable, C: UrlCache> UrlStore<T, C> {
    /// Creates a store deriving codes with SHA-256.
    pub fn new(table: T, cache: C) -> Self {
        Self::with_generator(table, cache, Sha256Generator)
    }
}

impl<T: DurableTable> UrlStore<Arc<T>, ConfiguredCache> {
    /// Creates a store whose cache tier is built from `settings`. The table
    /// is shared with the cache so evicted clicks can be written back.
    pub fn from_settings(table: T, settings: &StoreSettings) -> Self {
        let table = Arc::new(table);
        let write_back: Arc<dyn DurableTable> = table.clone();
        Self::new(table, settings.build_cache(write_back))
    }
}

impl<T: DurableTable, C: UrlCache, G: Generator> UrlStore<T, C, G> {
    /// Creates a store with a custom code generator.
    pub fn with_generator(table: T, cache: C, generator: G) -> Self {
        Self {
            table,
            cache,
            generator,
        }
    }

    /// Returns a reference to the durable table.
    pub fn table(&self) -> &T {
        &self.table
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Caches `record` if the cache has room. Cache failures only cost a
    /// future cache miss.
    async fn cache_record(&self, record: &UrlRecord) -> bool {
        match self.cache.insert(record).await {
            Ok(cached) => cached,
            Err(e) => {
                warn!(code = %record.short_code, error = %e, "Cache error on insert");
                false
            }
        }
    }

    async fn cached(&self, code: &ShortCode) -> Option<UrlRecord> {
        match self.cache.get(code).await {
            Ok(record) => record,
            Err(e) => {
                warn!(code = %code, error = %e, "Cache error on get, falling back to durable table");
                None
            }
        }
    }
}

fn parse_code(short_code: &str) -> Option<ShortCode> {
    match ShortCode::new(short_code) {
        Ok(code) => Some(code),
        Err(e) => {
            trace!(short_code, error = %e, "Rejecting malformed short code");
            None
        }
    }
}

#[async_trait]
impl<T: DurableTable, C: UrlCache, G: Generator> Shortener for UrlStore<T, C, G> {
    async fn create(&self, long_url: &str) -> Created {
        let long_url = normalize_url(long_url);
        let short_code = self.generator.generate(&long_url);
        let record = UrlRecord::new(short_code.clone(), long_url.clone());

        let outcome = match self.table.conditional_put(&record).await {
            Ok(PutOutcome::Inserted) => {
                let cached = self.cache_record(&record).await;
                debug!(code = %short_code, cached, "Stored new URL record");
                CreateOutcome::Inserted
            }
            Ok(PutOutcome::AlreadyExists) => {
                debug!(code = %short_code, "URL record already stored");
                CreateOutcome::AlreadyExists
            }
            Err(error) => {
                let cached = self.cache_record(&record).await;
                warn!(
                    code = %short_code,
                    error = %error,
                    cached,
                    "Durable table unavailable, storing URL record in cache only"
                );
                CreateOutcome::Degraded { error, cached }
            }
        };

        Created {
            short_code,
            long_url,
            outcome,
        }
    }

    async fn resolve(&self, short_code: &str) -> Lookup<String> {
        let Some(code) = parse_code(short_code) else {
            return Lookup::NotFound;
        };

        match self.cache.increment_clicks(&code).await {
            Ok(Some(record)) => {
                debug!(code = %code, clicks = record.clicks, "Resolved from cache");
                return Lookup::Found(record.long_url);
            }
            Ok(None) => trace!(code = %code, "Cache miss, querying durable table"),
            Err(e) => {
                warn!(code = %code, error = %e, "Cache error on resolve, falling back to durable table")
            }
        }

        let record = match self.table.get(&code).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(code = %code, "Short code not found");
                return Lookup::NotFound;
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Durable table error on resolve");
                return Lookup::Unavailable(e);
            }
        };

        match self.table.increment_clicks(&code, 1).await {
            Ok(Some(clicks)) => {
                let long_url = record.long_url.clone();
                let cached = self.cache_record(&record.with_clicks(clicks)).await;
                debug!(code = %code, clicks, cached, "Resolved from durable table");
                Lookup::Found(long_url)
            }
            Ok(None) => {
                debug!(code = %code, "Record removed while resolving");
                Lookup::NotFound
            }
            Err(e) => {
                // The target is known; only this click goes uncounted.
                warn!(code = %code, error = %e, "Failed to count click");
                Lookup::Found(record.long_url)
            }
        }
    }

    async fn get_stats(&self, short_code: &str) -> Lookup<UrlRecord> {
        let Some(code) = parse_code(short_code) else {
            return Lookup::NotFound;
        };

        if let Some(record) = self.cached(&code).await {
            return Lookup::Found(record);
        }

        match self.table.get(&code).await {
            Ok(Some(record)) => Lookup::Found(record),
            Ok(None) => Lookup::NotFound,
            Err(e) => {
                warn!(code = %code, error = %e, "Durable table error on stats");
                Lookup::Unavailable(e)
            }
        }
    }
}
