use crate::error::StorageError;
use crate::record::UrlRecord;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

/// How a `create` call was satisfied.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    /// A new record was written to the durable tier.
    Inserted,
    /// The durable tier already held a record under this code.
    AlreadyExists,
    /// The durable tier could not be reached; the record lives only in the
    /// cache of this instance, if the cache accepted it.
    Degraded { error: StorageError, cached: bool },
}

/// Result of shortening a URL.
#[derive(Debug, Clone)]
pub struct Created {
    /// The derived short code.
    pub short_code: ShortCode,
    /// The normalized URL the code points to.
    pub long_url: String,
    pub outcome: CreateOutcome,
}

impl Created {
    /// Whether the mapping is known to be in the durable tier.
    pub fn is_durable(&self) -> bool {
        !matches!(self.outcome, CreateOutcome::Degraded { .. })
    }
}

/// Result of a cache-then-durable lookup.
#[derive(Debug, Clone)]
pub enum Lookup<T> {
    Found(T),
    /// Absent from both tiers, or the code was malformed.
    NotFound,
    /// Absent from the cache, and the durable tier failed to answer.
    Unavailable(StorageError),
}

impl<T> Lookup<T> {
    /// Collapses the lookup into found / not-found, treating a durable-tier
    /// failure as not-found.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::Unavailable(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Unavailable(err) => Lookup::Unavailable(err),
        }
    }
}

/// The operations a request adapter drives.
///
/// None of these fail outright: every durable-tier problem is folded into
/// [`CreateOutcome::Degraded`] or [`Lookup::Unavailable`].
#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Shortens a URL, returning the same code for the same URL every time.
    async fn create(&self, long_url: &str) -> Created;

    /// Resolves a short code to its long URL, counting one click.
    async fn resolve(&self, short_code: &str) -> Lookup<String>;

    /// Returns the stored record for a short code without counting a click.
    async fn get_stats(&self, short_code: &str) -> Lookup<UrlRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn found_collapses_unavailable_to_none() {
        let found: Lookup<u8> = Lookup::Found(1);
        let missing: Lookup<u8> = Lookup::NotFound;
        let failed: Lookup<u8> = Lookup::Unavailable(StorageError::Unavailable("down".into()));

        assert_eq!(found.found(), Some(1));
        assert_eq!(missing.found(), None);
        assert_eq!(failed.found(), None);
    }

    #[test]
    fn map_keeps_variant() {
        let failed: Lookup<u8> = Lookup::Unavailable(StorageError::Timeout("slow".into()));
        assert!(matches!(failed.map(|v| v + 1), Lookup::Unavailable(_)));
        assert!(matches!(Lookup::Found(1u8).map(|v| v + 1), Lookup::Found(2)));
    }

    #[test]
    fn degraded_is_not_durable() {
        let code = ShortCode::new_unchecked("c1a2b3d4");
        let degraded = Created {
            short_code: code.clone(),
            long_url: "https://a.b".into(),
            outcome: CreateOutcome::Degraded {
                error: StorageError::Unavailable("down".into()),
                cached: true,
            },
        };
        let existing = Created {
            short_code: code,
            long_url: "https://a.b".into(),
            outcome: CreateOutcome::AlreadyExists,
        };

        assert!(!degraded.is_durable());
        assert!(existing.is_durable());
    }
}
