//! Cache of the authenticated portal session.
//!
//! A login through the portal's web UI takes seconds, so the cookies it
//! yields are kept for a bounded time and shared by every attendance call.
//! This crate provides:
//! - [`SessionCache`]: one cached session with a TTL and a single-flight
//!   refresh lock, so a burst of callers on a cold cache triggers one login
//! - [`SessionProvider`]: the capability that actually performs a login
//! - the login error taxonomy shared by providers and callers
//!
//! # Example
//!
//! ```rust,ignore
//! use punchclock_session::{CacheConfig, SessionCache};
//!
//! let cache = SessionCache::new(credentials, provider, CacheConfig::default());
//! let cookies = cache.get(false).await?;
//! ```

mod cache;
mod config;
mod error;
mod provider;
mod ttl;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::{CacheStats, SessionCache, SessionInfo};
pub use config::{CacheConfig, DEFAULT_TTL};
pub use error::{Error, Result};
pub use provider::{SessionProvider, SharedSessionProvider};
pub use ttl::CachedSession;
