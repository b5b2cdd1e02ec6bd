use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Number of hex characters in a short code.
pub const SHORT_CODE_LEN: usize = 8;

/// A validated short code identifier for a shortened URL.
///
/// Short codes are exactly 8 lowercase hexadecimal characters. They are
/// derived from the long URL, never chosen by users.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    pub fn new(code: impl Into<String>) -> std::result::Result<Self, CoreError> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. the digest generator, which always emits valid output).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> std::result::Result<(), CoreError> {
        if code.len() != SHORT_CODE_LEN {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be {}, got {}",
                SHORT_CODE_LEN,
                code.len()
            )));
        }

        if !code
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only lowercase hex characters: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShortCode {
    type Err = CoreError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = CoreError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(code: ShortCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("abcdef01").is_ok());
        assert!(ShortCode::new("00000000").is_ok());
        assert!(ShortCode::new("ffffffff").is_ok());
    }

    #[test]
    fn wrong_length() {
        assert!(ShortCode::new("").is_err());
        assert!(ShortCode::new("abc").is_err());
        assert!(ShortCode::new("abcdef012").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("ABCDEF01").is_err());
        assert!(ShortCode::new("abcdefgh").is_err());
        assert!(ShortCode::new("abc/ef01").is_err());
    }

    #[test]
    fn display_and_parse() {
        let code: ShortCode = "c1a2b3d4".parse().unwrap();
        assert_eq!(code.to_string(), "c1a2b3d4");
    }

    #[test]
    fn to_url() {
        let code = ShortCode::new("c1a2b3d4").unwrap();
        assert_eq!(code.to_url("https://hl.ink"), "https://hl.ink/c1a2b3d4");
        assert_eq!(code.to_url("https://hl.ink/"), "https://hl.ink/c1a2b3d4");
    }

    #[test]
    fn deserialize_rejects_invalid() {
        assert!(serde_json::from_str::<ShortCode>("\"c1a2b3d4\"").is_ok());
        assert!(serde_json::from_str::<ShortCode>("\"nope\"").is_err());
    }
}
