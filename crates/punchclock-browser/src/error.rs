//! Error types for browser control.

use std::time::Duration;

use chromiumoxide::error::CdpError;

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, BrowserError>;

/// Errors raised while launching or driving the browser.
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    /// No Chrome/Chromium executable was found.
    #[error("Could not find a Chrome/Chromium executable; set the browser path explicitly")]
    ExecutableNotFound,

    /// The browser process could not be started.
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    /// The browser did not announce its DevTools endpoint in time.
    #[error("Browser did not expose a DevTools endpoint within {}s", .0.as_secs())]
    StartupTimeout(Duration),

    /// Connecting to the DevTools endpoint failed.
    #[error("Failed to connect to DevTools endpoint: {0}")]
    Connect(String),

    /// A DevTools command failed.
    #[error("DevTools protocol error: {0}")]
    Protocol(String),

    /// No element matched a selector.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Navigation was rejected by the browser.
    #[error("Navigation failed: {0}")]
    Navigation(String),
}

impl BrowserError {
    /// Whether a later retry of the same check may succeed.
    ///
    /// Protocol errors and missing elements happen routinely while a page
    /// is navigating; a failed launch or connection never recovers.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BrowserError::Protocol(_) | BrowserError::ElementNotFound(_)
        )
    }
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        BrowserError::Protocol(e.to_string())
    }
}

impl From<BrowserError> for punchclock_session::Error {
    fn from(e: BrowserError) -> Self {
        punchclock_session::Error::Browser(e.to_string())
    }
}
