//! CLI command handlers.

pub mod attendance;
pub mod config;
pub mod login;
pub mod serve;

use std::path::PathBuf;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Config directory override.
    pub config_dir: Option<PathBuf>,
}
