//! Session provider capability.
//!
//! The cache knows nothing about browsers: it asks a [`SessionProvider`]
//! for a fresh cookie set whenever its entry is missing or stale. The
//! production provider drives a headless browser through the portal login
//! UI; tests substitute a scripted one.

use std::sync::Arc;

use async_trait::async_trait;
use punchclock_types::{Credentials, SessionCookies};

use crate::error::Result;

/// Performs one login and returns the resulting session cookies.
///
/// Implementations must not retry internally and must not be called
/// concurrently; [`SessionCache`](crate::SessionCache) guarantees the latter.
#[async_trait]
pub trait SessionProvider: Send + Sync + std::fmt::Debug {
    /// Log in with `credentials` and collect the session's cookies.
    async fn login(&self, credentials: &Credentials) -> Result<SessionCookies>;
}

/// Shared provider handle.
pub type SharedSessionProvider = Arc<dyn SessionProvider>;
