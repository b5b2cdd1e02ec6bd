use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hashlink_core::table::Result;
use hashlink_core::{DurableTable, PutOutcome, ShortCode, UrlRecord};

/// In-memory implementation of [`DurableTable`] using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. The entry API holds the shard lock across the
/// existence check and the insert, which is what makes `conditional_put`
/// atomic.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTable {
    storage: DashMap<ShortCode, UrlRecord>,
}

impl InMemoryTable {
    /// Creates a new in-memory table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory table with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl DurableTable for InMemoryTable {
    async fn conditional_put(&self, record: &UrlRecord) -> Result<PutOutcome> {
        match self.storage.entry(record.short_code.clone()) {
            Entry::Occupied(_) => Ok(PutOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(PutOutcome::Inserted)
            }
        }
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self.storage.get(code).map(|entry| entry.value().clone()))
    }

    async fn increment_clicks(&self, code: &ShortCode, delta: u64) -> Result<Option<u64>> {
        Ok(self.storage.get_mut(code).map(|mut entry| {
            entry.clicks = entry.clicks.saturating_add(delta);
            entry.clicks
        }))
    }
}
