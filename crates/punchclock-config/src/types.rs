//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! [dooray]        # tenant and login account
//! [session]       # session cache
//! [browser]       # headless browser used for logins
//! [server]        # webhook server
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use punchclock_types::{Credentials, DEFAULT_PORTAL_DOMAIN};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default webhook bind address.
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Default session lifetime in seconds.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// Default browser startup timeout in seconds.
pub const DEFAULT_BROWSER_STARTUP_SECS: u64 = 15;

/// Default attendance request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Every field is optional so that partial layers (user config, project
/// file, environment) can be merged field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PunchclockConfig {
    pub dooray: DoorayConfig,
    pub session: SessionConfig,
    pub browser: BrowserConfig,
    pub server: ServerConfig,
}

/// Tenant and login account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorayConfig {
    /// Tenant subdomain (`acme` for `acme.dooray.com`).
    pub subdomain: Option<String>,
    pub username: Option<String>,
    /// Better supplied through `DOORAY_LOGIN_PASSWORD`.
    pub password: Option<String>,
    /// Portal domain, `dooray.com` unless the tenant is hosted elsewhere.
    pub portal_domain: Option<String>,
    /// Attendance request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
}

/// Session cache configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session lifetime in seconds.
    pub ttl_secs: Option<u64>,
}

/// Browser configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Browser executable; discovered when unset.
    pub path: Option<PathBuf>,
    pub headless: Option<bool>,
    /// Pass `--no-sandbox` (containers without user namespaces).
    pub no_sandbox: Option<bool>,
    pub startup_timeout_secs: Option<u64>,
}

/// Webhook server configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to, e.g. `0.0.0.0:8000`.
    pub bind: Option<String>,
}

impl PunchclockConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: PunchclockConfig) {
        let PunchclockConfig {
            dooray,
            session,
            browser,
            server,
        } = other;

        overlay(&mut self.dooray.subdomain, dooray.subdomain);
        overlay(&mut self.dooray.username, dooray.username);
        overlay(&mut self.dooray.password, dooray.password);
        overlay(&mut self.dooray.portal_domain, dooray.portal_domain);
        overlay(
            &mut self.dooray.request_timeout_secs,
            dooray.request_timeout_secs,
        );

        overlay(&mut self.session.ttl_secs, session.ttl_secs);

        overlay(&mut self.browser.path, browser.path);
        overlay(&mut self.browser.headless, browser.headless);
        overlay(&mut self.browser.no_sandbox, browser.no_sandbox);
        overlay(
            &mut self.browser.startup_timeout_secs,
            browser.startup_timeout_secs,
        );

        overlay(&mut self.server.bind, server.bind);
    }

    /// Whether a password is set in this (file) layer.
    pub fn has_plaintext_password(&self) -> bool {
        self.dooray
            .password
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty())
    }

    /// Apply defaults. Does not validate; see [`Settings::validate`].
    pub fn resolve(&self) -> Settings {
        Settings {
            subdomain: trimmed(&self.dooray.subdomain),
            username: trimmed(&self.dooray.username),
            password: self.dooray.password.clone().unwrap_or_default(),
            portal_domain: non_empty(&self.dooray.portal_domain)
                .unwrap_or_else(|| DEFAULT_PORTAL_DOMAIN.to_string()),
            request_timeout: Duration::from_secs(
                self.dooray
                    .request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            session_ttl: Duration::from_secs(
                self.session.ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS),
            ),
            browser_path: self.browser.path.clone(),
            headless: self.browser.headless.unwrap_or(true),
            no_sandbox: self.browser.no_sandbox.unwrap_or(false),
            browser_startup_timeout: Duration::from_secs(
                self.browser
                    .startup_timeout_secs
                    .unwrap_or(DEFAULT_BROWSER_STARTUP_SECS),
            ),
            bind: non_empty(&self.server.bind).unwrap_or_else(|| DEFAULT_BIND.to_string()),
        }
    }
}

fn overlay<T>(base: &mut Option<T>, layer: Option<T>) {
    if layer.is_some() {
        *base = layer;
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn trimmed(value: &Option<String>) -> String {
    non_empty(value).unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolved Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Fully resolved settings with defaults applied.
#[derive(Clone, PartialEq, Serialize)]
pub struct Settings {
    pub subdomain: String,
    pub username: String,
    pub password: String,
    pub portal_domain: String,
    #[serde(with = "secs")]
    pub request_timeout: Duration,
    #[serde(with = "secs")]
    pub session_ttl: Duration,
    pub browser_path: Option<PathBuf>,
    pub headless: bool,
    pub no_sandbox: bool,
    #[serde(with = "secs")]
    pub browser_startup_timeout: Duration,
    pub bind: String,
}

impl Settings {
    /// Check that everything needed for an attendance request is present.
    ///
    /// Lists every missing key at once rather than stopping at the first.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.subdomain.is_empty() {
            missing.push("dooray.subdomain (DOORAY_SUBDOMAIN)".to_string());
        }
        if self.username.is_empty() {
            missing.push("dooray.username (DOORAY_LOGIN_USERNAME)".to_string());
        }
        if self.password.trim().is_empty() {
            missing.push("dooray.password (DOORAY_LOGIN_PASSWORD)".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingSettings(missing));
        }

        if !self
            .subdomain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConfigError::InvalidValue {
                key: "dooray.subdomain".to_string(),
                message: format!("'{}' is not a valid subdomain", self.subdomain),
            });
        }
        if self.session_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "session.ttl_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        self.bind_addr()?;
        Ok(())
    }

    /// Parsed webhook bind address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind.parse().map_err(|e| ConfigError::InvalidValue {
            key: "server.bind".to_string(),
            message: format!("'{}': {}", self.bind, e),
        })
    }

    /// Login credentials.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.subdomain, &self.username, &self.password)
    }

    /// Copy with the password replaced, for display.
    pub fn masked(&self) -> Settings {
        let mut masked = self.clone();
        if !masked.password.is_empty() {
            masked.password = "********".to_string();
        }
        masked
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("subdomain", &self.subdomain)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("portal_domain", &self.portal_domain)
            .field("session_ttl", &self.session_ttl)
            .field("browser_path", &self.browser_path)
            .field("bind", &self.bind)
            .finish()
    }
}

mod secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }
}
