//! Error types for session acquisition.

use std::time::Duration;

/// Errors raised while acquiring an authenticated session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Credentials or other required settings are missing.
    ///
    /// Raised before any browser work starts.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A step of the login flow did not become ready in time.
    #[error("Login step '{step}' timed out after {}s", timeout.as_secs_f32())]
    LoginTimeout { step: String, timeout: Duration },

    /// The login flow finished but yielded no cookies.
    #[error("Cookie acquisition failed: {0}")]
    CookieAcquisition(String),

    /// The browser could not be launched or driven.
    #[error("Browser error: {0}")]
    Browser(String),
}

impl Error {
    /// Check if this is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Check if this is a login step timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::LoginTimeout { .. })
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, Error>;
