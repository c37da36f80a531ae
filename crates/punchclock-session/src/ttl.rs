//! Cached session entry and its expiry check.

use std::time::Duration;

use chrono::{DateTime, Utc};
use punchclock_types::SessionCookies;
use tokio::time::Instant;

/// One acquired session as held by the cache.
///
/// Published wholesale behind an `Arc` and never mutated afterwards, so
/// readers can hold on to it without a lock.
#[derive(Debug, Clone)]
pub struct CachedSession {
    /// Cookies returned by the provider.
    pub cookies: SessionCookies,

    /// Monotonic acquisition time, used for expiry.
    pub acquired_at: Instant,

    /// Wall-clock acquisition time, for display.
    pub acquired_at_utc: DateTime<Utc>,

    /// Sequence number of the refresh that produced this entry.
    pub generation: u64,
}

impl CachedSession {
    pub(crate) fn new(cookies: SessionCookies, generation: u64) -> Self {
        Self {
            cookies,
            acquired_at: Instant::now(),
            acquired_at_utc: Utc::now(),
            generation,
        }
    }

    /// Time since acquisition.
    pub fn age(&self) -> Duration {
        self.acquired_at.elapsed()
    }

    /// Whether the entry is still inside its TTL: `age < ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }

    /// Remaining lifetime, zero once expired.
    pub fn remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}
