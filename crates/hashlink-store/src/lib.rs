//! The two-tier URL store.
//!
//! [`UrlStore`] implements [`hashlink_core::Shortener`] on top of any
//! [`DurableTable`](hashlink_core::DurableTable) and
//! [`UrlCache`](hashlink_core::UrlCache).

pub mod normalize;
pub mod settings;
pub mod store;

pub use normalize::normalize_url;
pub use settings::{ConfiguredCache, EvictionPolicy, StoreSettings, DEFAULT_CACHE_CAPACITY};
pub use store::UrlStore;
