use async_trait::async_trait;
use hashlink_core::cache::Result;
use hashlink_core::{ShortCode, UrlCache, UrlRecord};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A fixed-capacity in-memory cache that stops accepting new entries once
/// full.
///
/// Nothing is ever evicted: once `capacity` distinct codes are held, further
/// inserts for new codes are refused and those records are only reachable
/// through the durable tier. All access goes through a single mutex, so the
/// size bound holds under concurrent inserts.
#[derive(Debug)]
pub struct BoundedUrlCache {
    capacity: usize,
    entries: Mutex<HashMap<ShortCode, UrlRecord>>,
}

impl BoundedUrlCache {
    /// Creates a cache holding at most `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(HashMap::with_capacity(capacity.min(1024))),
        }
    }

    /// Maximum number of records the cache will hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[async_trait]
impl UrlCache for BoundedUrlCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let record = self.entries.lock().get(code).cloned();
        match record {
            Some(_) => debug!(code = %code, "Cache hit"),
            None => trace!(code = %code, "Cache miss"),
        }
        Ok(record)
    }

    async fn insert(&self, record: &UrlRecord) -> Result<bool> {
        let mut entries = self.entries.lock();

        if entries.contains_key(&record.short_code) {
            trace!(code = %record.short_code, "Already cached, keeping existing entry");
            return Ok(true);
        }

        if entries.len() >= self.capacity {
            debug!(
                code = %record.short_code,
                capacity = self.capacity,
                "Cache full, not caching record"
            );
            return Ok(false);
        }

        entries.insert(record.short_code.clone(), record.clone());
        trace!(code = %record.short_code, "Cached record");
        Ok(true)
    }

    async fn increment_clicks(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let mut entries = self.entries.lock();
        Ok(entries.get_mut(code).map(|record| {
            record.clicks = record.clicks.saturating_add(1);
            record.clone()
        }))
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }
}
