//! Single-flight session cache with TTL.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use punchclock_types::{Credentials, SessionCookies};
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

use crate::config::CacheConfig;
use crate::error::{Error, Result};
use crate::provider::SharedSessionProvider;
use crate::ttl::CachedSession;

/// Holds at most one authenticated session for a set of credentials.
///
/// - A fresh entry is served straight from the slot, without touching the
///   refresh lock.
/// - A missing, expired or force-refreshed entry is re-acquired under a
///   single-flight lock: concurrent callers wait for the one login in
///   progress and share its result.
/// - [`invalidate`](Self::invalidate) drops the entry; the next
///   [`get`](Self::get) logs in again.
///
/// Owned by the composition root and shared by `Arc`; independent
/// instances do not interact.
pub struct SessionCache {
    credentials: Credentials,
    provider: SharedSessionProvider,
    config: CacheConfig,

    /// Current entry, replaced wholesale on refresh.
    slot: RwLock<Option<Arc<CachedSession>>>,

    /// Serialises logins.
    refresh_lock: Mutex<()>,

    /// Generation of the most recent successful refresh.
    generation: AtomicU64,

    counters: Counters,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    refreshes: AtomicU64,
    invalidations: AtomicU64,
    login_failures: AtomicU64,
}

impl SessionCache {
    /// Create an empty cache that logs in through `provider`.
    pub fn new(
        credentials: Credentials,
        provider: SharedSessionProvider,
        config: CacheConfig,
    ) -> Self {
        Self {
            credentials,
            provider,
            config,
            slot: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
            counters: Counters::default(),
        }
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Credentials used for every login.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Return usable session cookies, logging in if necessary.
    ///
    /// With `force_refresh` the cached entry is ignored, unless another
    /// caller completed a refresh while this one waited for the lock; that
    /// result is returned instead of logging in a second time.
    pub async fn get(&self, force_refresh: bool) -> Result<SessionCookies> {
        let missing = self.credentials.missing_fields();
        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "missing credentials: {}",
                missing.join(", ")
            )));
        }

        // Read before inspecting the slot so a refresh finishing in between
        // is still detected after the lock is taken.
        let observed = self.generation.load(Ordering::Acquire);

        if !force_refresh && let Some(session) = self.fresh_entry() {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            trace!(generation = session.generation, "Session cache hit");
            return Ok(session.cookies.clone());
        }

        let _guard = self.refresh_lock.lock().await;

        if let Some(session) = self.fresh_entry()
            && (!force_refresh || session.generation > observed)
        {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            debug!(
                generation = session.generation,
                "Using session refreshed by a concurrent caller"
            );
            return Ok(session.cookies.clone());
        }

        self.refresh().await
    }

    /// Drop the cached entry. Idempotent.
    pub fn invalidate(&self) {
        let previous = self.slot.write().take();
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
        if let Some(session) = previous {
            info!(generation = session.generation, "Session invalidated");
        }
    }

    /// Whether a fresh entry is currently cached.
    pub fn is_valid(&self) -> bool {
        self.fresh_entry().is_some()
    }

    /// Describe the current entry, if any.
    pub fn info(&self) -> Option<SessionInfo> {
        let session = self.slot.read().clone()?;
        Some(SessionInfo {
            acquired_at: session.acquired_at_utc,
            age: session.age(),
            expires_in: session.remaining(self.config.ttl),
            is_expired: !session.is_fresh(self.config.ttl),
            cookie_count: session.cookies.len(),
            generation: session.generation,
        })
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            refreshes: self.counters.refreshes.load(Ordering::Relaxed),
            invalidations: self.counters.invalidations.load(Ordering::Relaxed),
            login_failures: self.counters.login_failures.load(Ordering::Relaxed),
        }
    }

    fn fresh_entry(&self) -> Option<Arc<CachedSession>> {
        self.slot
            .read()
            .as_ref()
            .filter(|session| session.is_fresh(self.config.ttl))
            .cloned()
    }

    /// Run the provider once and publish its result. Caller holds the lock.
    async fn refresh(&self) -> Result<SessionCookies> {
        debug!(subdomain = %self.credentials.subdomain, "Acquiring new portal session");
        let started = tokio::time::Instant::now();

        let cookies = match self.provider.login(&self.credentials).await {
            Ok(cookies) if cookies.is_empty() => {
                self.counters.login_failures.fetch_add(1, Ordering::Relaxed);
                return Err(Error::CookieAcquisition(
                    "login provider returned no cookies".to_string(),
                ));
            }
            Ok(cookies) => cookies,
            Err(e) => {
                self.counters.login_failures.fetch_add(1, Ordering::Relaxed);
                warn!(error = %e, "Portal login failed");
                return Err(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let session = Arc::new(CachedSession::new(cookies, generation));
        *self.slot.write() = Some(Arc::clone(&session));
        self.counters.refreshes.fetch_add(1, Ordering::Relaxed);

        info!(
            generation,
            cookie_count = session.cookies.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Portal session acquired"
        );

        Ok(session.cookies.clone())
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("credentials", &self.credentials)
            .field("provider", &self.provider)
            .field("config", &self.config)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}

/// Snapshot of the cached entry, for display.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub acquired_at: DateTime<Utc>,
    pub age: Duration,
    pub expires_in: Duration,
    pub is_expired: bool,
    pub cookie_count: usize,
    pub generation: u64,
}

impl SessionInfo {
    pub fn expires_in_display(&self) -> String {
        if self.is_expired {
            "Expired (will refresh on next use)".to_string()
        } else {
            let secs = self.expires_in.as_secs();
            format!("{}m {}s", secs / 60, secs % 60)
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Calls served from the cached entry.
    pub hits: u64,

    /// Successful logins.
    pub refreshes: u64,

    /// Calls to [`SessionCache::invalidate`].
    pub invalidations: u64,

    /// Logins that failed.
    pub login_failures: u64,
}
