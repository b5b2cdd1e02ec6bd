use async_trait::async_trait;
use hashlink_cache::{BoundedUrlCache, MokaUrlCache};
use hashlink_core::cache::Result;
use hashlink_core::{DurableTable, ShortCode, UrlCache, UrlRecord};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use typed_builder::TypedBuilder;

pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// What the cache does once it holds `cache_capacity` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvictionPolicy {
    /// Refuse new records; everything already cached stays.
    #[default]
    Reject,
    /// Evict the least useful records to make room. Cached clicks of an
    /// evicted record are written back to the durable table.
    Evict,
}

impl Display for EvictionPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EvictionPolicy::Reject => write!(f, "reject"),
            EvictionPolicy::Evict => write!(f, "evict"),
        }
    }
}

/// Tuning for a [`UrlStore`](crate::UrlStore).
#[derive(Debug, Clone, TypedBuilder)]
pub struct StoreSettings {
    /// Maximum number of records held by the cache tier.
    #[builder(default = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,
    #[builder(default)]
    pub eviction: EvictionPolicy,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl StoreSettings {
    /// Builds the cache tier these settings describe. An evicting cache
    /// writes cached clicks back to `table`.
    pub fn build_cache(&self, table: Arc<dyn DurableTable>) -> ConfiguredCache {
        match self.eviction {
            EvictionPolicy::Reject => {
                ConfiguredCache::Bounded(BoundedUrlCache::with_capacity(self.cache_capacity))
            }
            EvictionPolicy::Evict => {
                ConfiguredCache::Evicting(MokaUrlCache::with_write_back(
                    self.cache_capacity as u64,
                    table,
                ))
            }
        }
    }
}

/// A cache tier chosen at runtime from [`StoreSettings`].
#[derive(Debug)]
pub enum ConfiguredCache {
    Bounded(BoundedUrlCache),
    Evicting(MokaUrlCache),
}

#[async_trait]
impl UrlCache for ConfiguredCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        match self {
            ConfiguredCache::Bounded(cache) => cache.get(code).await,
            ConfiguredCache::Evicting(cache) => cache.get(code).await,
        }
    }

    async fn insert(&self, record: &UrlRecord) -> Result<bool> {
        match self {
            ConfiguredCache::Bounded(cache) => cache.insert(record).await,
            ConfiguredCache::Evicting(cache) => cache.insert(record).await,
        }
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        match self {
            ConfiguredCache::Bounded(cache) => cache.increment_clicks(code).await,
            ConfiguredCache::Evicting(cache) => cache.increment_clicks(code).await,
        }
    }

    fn len(&self) -> usize {
        match self {
            ConfiguredCache::Bounded(cache) => cache.len(),
            ConfiguredCache::Evicting(cache) => cache.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashlink_storage::UnavailableTable;

    #[test]
    fn defaults() {
        let settings = StoreSettings::default();
        assert_eq!(settings.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(settings.eviction, EvictionPolicy::Reject);
    }

    #[test]
    fn builds_matching_cache() {
        let reject = StoreSettings::builder().cache_capacity(3).build();
        let table: Arc<dyn DurableTable> = Arc::new(UnavailableTable::default());
        assert!(matches!(
            reject.build_cache(table.clone()),
            ConfiguredCache::Bounded(c) if c.capacity() == 3
        ));

        let evict = StoreSettings::builder()
            .eviction(EvictionPolicy::Evict)
            .build();
        assert!(matches!(evict.build_cache(table), ConfiguredCache::Evicting(_)));
    }
}
