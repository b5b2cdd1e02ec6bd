use crate::Generator;
use hashlink_core::shortcode::SHORT_CODE_LEN;
use hashlink_core::ShortCode;
use sha2::{Digest, Sha256};

/// Derives the short code for `long_url`: the first 8 lowercase hex
/// characters of its SHA-256 digest.
pub fn derive_code(long_url: &str) -> ShortCode {
    let digest = Sha256::digest(long_url.as_bytes());
    // 4 bytes encode to exactly SHORT_CODE_LEN hex characters.
    let code = hex::encode(&digest[..SHORT_CODE_LEN / 2]);
    ShortCode::new_unchecked(code)
}

/// The default [`Generator`], backed by [`derive_code`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Generator;

impl Generator for Sha256Generator {
    fn generate(&self, long_url: &str) -> ShortCode {
        derive_code(long_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn known_digests() {
        assert_eq!(derive_code("https://example.com/long").as_str(), "8d79e901");
        assert_eq!(derive_code("https://example.com/no-scheme").as_str(), "e5144ac6");
        assert_eq!(derive_code("").as_str(), "e3b0c442");
    }

    #[test]
    fn deterministic() {
        let url = "https://www.example.com/this-is-a-very-long-url";
        assert_eq!(derive_code(url), derive_code(url));
        assert_eq!(Sha256Generator.generate(url), derive_code(url));
    }

    #[test]
    fn output_is_a_valid_short_code() {
        let long = "x".repeat(10_000);
        for url in ["", "a", "https://例え.jp/パス", long.as_str()] {
            let code = derive_code(url);
            assert!(ShortCode::new(code.as_str()).is_ok(), "{code} for {url:?}");
        }
    }

    #[test]
    fn distinct_urls_get_distinct_codes() {
        let codes: HashSet<_> = (0..1_000)
            .map(|i| derive_code(&format!("https://example.com/page/{i}")))
            .collect();
        assert_eq!(codes.len(), 1_000);
    }
}
