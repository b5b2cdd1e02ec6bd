use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored mapping from a short code to its long URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The key, derived from `long_url`.
    pub short_code: ShortCode,
    /// The URL that was shortened, always carrying a scheme.
    pub long_url: String,
    /// When the record was first created. Never changes afterwards.
    #[serde(with = "jiff::fmt::serde::timestamp::second::required")]
    pub created_at: Timestamp,
    /// Number of successful resolves.
    pub clicks: u64,
}

impl UrlRecord {
    /// Creates a fresh record with no clicks, stamped with the current time.
    pub fn new(short_code: ShortCode, long_url: impl Into<String>) -> Self {
        Self {
            short_code,
            long_url: long_url.into(),
            created_at: Timestamp::now(),
            clicks: 0,
        }
    }

    /// Returns the same record with `clicks` replaced.
    pub fn with_clicks(mut self, clicks: u64) -> Self {
        self.clicks = clicks;
        self
    }
}
