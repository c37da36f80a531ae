//! Wiring: configuration in, clients and providers out.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use punchclock_browser::{BrowserLogin, LaunchOptions};
use punchclock_client::AttendanceClient;
use punchclock_config::{LoadedConfig, Settings};
use punchclock_session::{CacheConfig, SessionCache};
use punchclock_types::Endpoints;
use tracing::{debug, warn};

use crate::commands::Context;

/// Load layered configuration and resolve it, logging any warnings.
pub fn load(ctx: &Context) -> Result<(LoadedConfig, Settings)> {
    let loaded = punchclock_config::load_config_with_options(
        None,
        ctx.config_dir.as_deref(),
        |key| std::env::var(key).ok(),
    )
    .context("failed to load configuration")?;

    for warning in &loaded.warnings {
        warn!("{}", warning);
    }
    debug!(
        sources = ?loaded.loaded_from(),
        env = ?loaded.env_overrides,
        "configuration loaded"
    );

    let settings = loaded.config.resolve();
    Ok((loaded, settings))
}

/// Browser-backed session provider for `settings`.
pub fn build_provider(settings: &Settings) -> BrowserLogin {
    let launch = LaunchOptions {
        executable: settings.browser_path.clone(),
        headless: settings.headless,
        no_sandbox: settings.no_sandbox,
        startup_timeout: settings.browser_startup_timeout,
        ..LaunchOptions::default()
    };
    BrowserLogin::new(launch).with_portal_domain(&settings.portal_domain)
}

/// Attendance client with its own session cache.
///
/// Fails when required settings are missing.
pub fn build_client(settings: &Settings) -> Result<AttendanceClient> {
    settings.validate()?;

    let cache = SessionCache::new(
        settings.credentials(),
        Arc::new(build_provider(settings)),
        CacheConfig::new().with_ttl(settings.session_ttl),
    );

    let client = AttendanceClient::builder()
        .endpoints(Endpoints::resolve_with_domain(
            &settings.subdomain,
            &settings.portal_domain,
        ))
        .timeout(settings.request_timeout)
        .build(Arc::new(cache))?;
    Ok(client)
}
