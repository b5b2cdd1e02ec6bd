//! Core types and traits for the hashlink URL shortener.
//!
//! This crate provides the record and short code types, the two storage
//! tier traits, and the [`Shortener`] operations shared by the store and
//! the gateway.

pub mod cache;
pub mod error;
pub mod record;
pub mod shortcode;
pub mod shortener;
pub mod table;

pub use cache::UrlCache;
pub use error::{CacheError, CoreError, StorageError};
pub use record::UrlRecord;
pub use shortcode::ShortCode;
pub use shortener::{CreateOutcome, Created, Lookup, Shortener};
pub use table::{DurableTable, PutOutcome};
