//! Cache tier implementations for the URL store.

pub mod bounded;
pub mod moka;

pub use bounded::BoundedUrlCache;
pub use crate::moka::{CacheConfig, MokaUrlCache};
