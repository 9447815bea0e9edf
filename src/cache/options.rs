//! Per-call cache options.

use std::time::Duration;

// == Cache Options ==
/// Options recognized on `get`, `set` and `get_or_set`.
#[derive(Debug, Clone, Default)]
pub struct CacheOptions {
    /// Overrides the cache-wide default TTL for this entry
    pub ttl: Option<Duration>,
    /// On `get`, return an expired value instead of a miss.
    /// The stale entry's TTL is not extended.
    pub stale_while_revalidate: bool,
}

impl CacheOptions {
    /// Options with an explicit TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl: Some(ttl),
            ..Self::default()
        }
    }

    /// Options tolerating stale reads.
    pub fn stale_while_revalidate() -> Self {
        Self {
            stale_while_revalidate: true,
            ..Self::default()
        }
    }
}
