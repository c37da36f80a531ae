//! Config file discovery and layered merging.
//!
//! Resolution order (later overrides earlier):
//! 1. `<config dir>/config.toml` (user config)
//! 2. `./punchclock.toml` (project-local)
//! 3. Environment variables
//! 4. CLI arguments (handled externally)

use std::path::{Path, PathBuf};

use crate::{ConfigError, PunchclockConfig, Result};

/// Default config filename for project-local config.
const PROJECT_CONFIG_FILE: &str = "punchclock.toml";

/// Default config filename within the user config directory.
const USER_CONFIG_FILE: &str = "config.toml";

/// Application name for config directory resolution.
const APP_NAME: &str = "punchclock";

/// Environment variable to override the config directory.
const CONFIG_DIR_ENV: &str = "PUNCHCLOCK_CONFIG_DIR";

/// Tracks where each config layer was loaded from.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the config file.
    pub path: PathBuf,
    /// Whether the file was found and loaded.
    pub loaded: bool,
}

/// Result of config discovery and loading.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The merged configuration.
    pub config: PunchclockConfig,
    /// Sources that were checked, in order of precedence (lowest first).
    pub sources: Vec<ConfigSource>,
    /// Environment variables that overrode a file value or filled a gap.
    pub env_overrides: Vec<&'static str>,
    /// Warnings generated during loading (e.g., plaintext passwords).
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    /// Get paths of sources that were actually loaded.
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Load configuration from the default locations and the process environment.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None, |key| std::env::var(key).ok())
}

/// Load configuration with explicit control over every input.
///
/// `config_dir` overrides both `PUNCHCLOCK_CONFIG_DIR` and the platform
/// default. `env` looks up environment variables; pass `|_| None` to ignore
/// the environment.
pub fn load_config_with_options<F>(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
    env: F,
) -> Result<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = PunchclockConfig::new();
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    // 1. User config
    let user_config_path = match config_dir {
        Some(dir) => Some(dir.join(USER_CONFIG_FILE)),
        None => xdg_config_path(),
    };
    if let Some(path) = user_config_path {
        sources.push(load_layer(&mut config, &path, &mut warnings));
    }

    // 2. Project-local config
    let project_path = project_dir
        .map(|d| d.join(PROJECT_CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));
    sources.push(load_layer(&mut config, &project_path, &mut warnings));

    // 3. Environment
    let env_overrides = apply_env_overrides(&mut config, env);

    Ok(LoadedConfig {
        config,
        sources,
        env_overrides,
        warnings,
    })
}

/// Load config from a specific file path (no discovery).
pub fn load_config_file(path: &Path) -> Result<PunchclockConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    PunchclockConfig::from_toml(&contents)
}

/// Overlay environment variables onto `config`.
///
/// Values are trimmed; empty values are ignored. Returns the names of the
/// variables that were applied.
pub fn apply_env_overrides<F>(config: &mut PunchclockConfig, env: F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = Vec::new();
    let mut read = |key: &'static str| {
        let value = env(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        if value.is_some() {
            applied.push(key);
        }
        value
    };

    if let Some(v) = read("DOORAY_SUBDOMAIN") {
        config.dooray.subdomain = Some(v);
    }
    if let Some(v) = read("DOORAY_LOGIN_USERNAME") {
        config.dooray.username = Some(v);
    }
    if let Some(v) = read("DOORAY_LOGIN_PASSWORD") {
        config.dooray.password = Some(v);
    }
    if let Some(v) = read("DOORAY_PORTAL_DOMAIN") {
        config.dooray.portal_domain = Some(v);
    }
    if let Some(v) = read("PUNCHCLOCK_BROWSER_PATH") {
        config.browser.path = Some(PathBuf::from(v));
    }
    if let Some(v) = read("PUNCHCLOCK_BIND") {
        config.server.bind = Some(v);
    }

    applied
}

/// Get the user config file path.
pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// Get the user config directory for punchclock.
///
/// Checks `PUNCHCLOCK_CONFIG_DIR` first, then falls back to the platform
/// default (`~/.config/punchclock` on Linux).
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Directory for rolling log files, under the config directory.
pub fn log_dir(config_dir: Option<&Path>) -> Option<PathBuf> {
    config_dir
        .map(Path::to_path_buf)
        .or_else(xdg_config_dir)
        .map(|d| d.join("logs"))
}

/// Try to load a config file and merge it into the existing config.
///
/// A missing file is skipped; an unreadable or malformed one becomes a
/// warning.
fn load_layer(
    config: &mut PunchclockConfig,
    path: &Path,
    warnings: &mut Vec<String>,
) -> ConfigSource {
    if !path.is_file() {
        return ConfigSource {
            path: path.to_path_buf(),
            loaded: false,
        };
    }

    match load_config_file(path) {
        Ok(layer) => {
            if layer.has_plaintext_password() {
                warnings.push(format!(
                    "{} contains a plaintext password. \
                     Consider setting DOORAY_LOGIN_PASSWORD in the environment instead.",
                    path.display()
                ));
            }
            config.merge(layer);
            ConfigSource {
                path: path.to_path_buf(),
                loaded: true,
            }
        }
        Err(e) => {
            warnings.push(format!("Failed to load {}: {}", path.display(), e));
            ConfigSource {
                path: path.to_path_buf(),
                loaded: false,
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
