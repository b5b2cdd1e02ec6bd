use async_trait::async_trait;
use hashlink_core::table::Result;
use hashlink_core::{DurableTable, PutOutcome, ShortCode, StorageError, UrlRecord};

/// A durable tier that is never reachable.
///
/// Every call fails with [`StorageError::Unavailable`], which runs a store
/// permanently in degraded, cache-only mode.
#[derive(Debug, Clone)]
pub struct UnavailableTable {
    reason: String,
}

impl UnavailableTable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StorageError {
        StorageError::Unavailable(self.reason.clone())
    }
}

impl Default for UnavailableTable {
    fn default() -> Self {
        Self::new("no durable table configured")
    }
}

#[async_trait]
impl DurableTable for UnavailableTable {
    async fn conditional_put(&self, _record: &UrlRecord) -> Result<PutOutcome> {
        Err(self.error())
    }

    async fn get(&self, _code: &ShortCode) -> Result<Option<UrlRecord>> {
        Err(self.error())
    }

    async fn increment_clicks(&self, _code: &ShortCode, _delta: u64) -> Result<Option<u64>> {
        Err(self.error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_call_is_unavailable() {
        let table = UnavailableTable::new("down for maintenance");
        let record = UrlRecord::new(ShortCode::new_unchecked("abcd1234"), "https://a.b");

        let err = table.conditional_put(&record).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert_eq!(err.to_string(), "storage backend unavailable: down for maintenance");

        assert!(table.get(&record.short_code).await.is_err());
        assert!(table.increment_clicks(&record.short_code, 1).await.is_err());
    }
}
