//! Scripted session provider for tests.
//!
//! Enabled with the `testing` feature so dependent crates can exercise the
//! cache and the attendance client without a browser.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use punchclock_types::{Credentials, SessionCookies};

use crate::error::{Error, Result};
use crate::provider::SessionProvider;

enum Outcome {
    Fail(Error),
    Empty,
}

/// Provider that counts logins and hands out `SESSION=session-<n>`.
///
/// Outcomes queued with [`fail_next`](Self::fail_next) or
/// [`return_empty_next`](Self::return_empty_next) are consumed one login
/// at a time before falling back to success.
#[derive(Default)]
pub struct ScriptedProvider {
    logins: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Option<Duration>,
    queued: Mutex<VecDeque<Outcome>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every login take `delay` (tokio time).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the next login with `error`.
    pub fn fail_next(&self, error: Error) {
        self.queued.lock().push_back(Outcome::Fail(error));
    }

    /// Return an empty cookie set from the next login.
    pub fn return_empty_next(&self) {
        self.queued.lock().push_back(Outcome::Empty);
    }

    /// Number of logins started so far.
    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    /// Highest number of logins observed running at the same time.
    pub fn max_concurrent_logins(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ScriptedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedProvider")
            .field("logins", &self.login_count())
            .finish()
    }
}

#[async_trait]
impl SessionProvider for ScriptedProvider {
    async fn login(&self, _credentials: &Credentials) -> Result<SessionCookies> {
        let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let outcome = self.queued.lock().pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match outcome {
            Some(Outcome::Fail(error)) => Err(error),
            Some(Outcome::Empty) => Ok(SessionCookies::new()),
            None => Ok([("SESSION".to_string(), format!("session-{}", n))]
                .into_iter()
                .collect()),
        }
    }
}
