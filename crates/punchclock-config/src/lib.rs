//! Configuration for punchclock.
//!
//! Provides TOML-based configuration with:
//! - Portal account settings (`[dooray]`)
//! - Session cache, browser and webhook server sections
//! - Config file layering (user config dir + project-local overrides)
//! - Environment variable overrides (`DOORAY_*`, `PUNCHCLOCK_*`)
//!
//! Files hold partial configs; [`PunchclockConfig::resolve`] fills in
//! defaults and [`Settings::validate`] reports everything still missing.

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, apply_env_overrides, load_config, load_config_file,
    load_config_with_options, log_dir, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
