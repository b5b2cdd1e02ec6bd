//! Short code generation.
//!
//! Codes are derived from the long URL itself, so shortening the same URL
//! twice always yields the same code and no storage lookup is needed.

pub mod digest;

pub use digest::{derive_code, Sha256Generator};

use hashlink_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure functions of the input URL and don't interact
/// with storage. Two different URLs may map to the same code; callers
/// accept that rather than resolving it.
pub trait Generator: Send + Sync + 'static {
    /// Derives the short code for `long_url`.
    fn generate(&self, long_url: &str) -> ShortCode;
}
