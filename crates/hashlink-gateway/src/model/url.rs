use hashlink_core::UrlRecord;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CreateUrlRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct CreateUrlResponse {
    pub short_code: String,
    pub short_url: String,
    pub long_url: String,
    /// `false` when the mapping was only kept in this instance's cache.
    pub durable: bool,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub short_code: String,
    pub long_url: String,
    /// Unix seconds.
    pub created_at: i64,
    pub clicks: u64,
}

impl From<UrlRecord> for StatsResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            short_code: record.short_code.into(),
            long_url: record.long_url,
            created_at: record.created_at.as_second(),
            clicks: record.clicks,
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
