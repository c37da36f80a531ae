//! punchclock - clock in and out of a Dooray tenant.
//!
//! Main entry point for the punchclock CLI.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;

use commands::{attendance, config, login, serve};
use punchclock_types::AttendanceType;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// punchclock - record attendance on a Dooray tenant
#[derive(Parser)]
#[command(name = "punchclock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Config directory (default: platform config dir + /punchclock)
    #[arg(long, global = true, env = "PUNCHCLOCK_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clock in
    Enter(attendance::AttendanceArgs),

    /// Clock out
    Leave(attendance::AttendanceArgs),

    /// Run the browser login once and report the session cookies
    Login(login::LoginArgs),

    /// Run the slash-command webhook server
    Serve(serve::ServeArgs),

    /// Show the resolved configuration
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered file logs are flushed on exit.
    let _guard = init_tracing(cli.verbose, cli.config_dir.as_deref());

    let ctx = commands::Context {
        json_output: cli.json,
        verbose: cli.verbose,
        config_dir: cli.config_dir,
    };

    match cli.command {
        Commands::Enter(args) => attendance::run(AttendanceType::Enter, args, &ctx).await,
        Commands::Leave(args) => attendance::run(AttendanceType::Leave, args, &ctx).await,
        Commands::Login(args) => login::run(args, &ctx).await,
        Commands::Serve(args) => serve::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}

/// Console (human-readable, stderr) plus a daily-rolling JSON file.
///
/// Falls back to console only when the log directory is unusable.
fn init_tracing(
    verbose: bool,
    config_dir: Option<&std::path::Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::prelude::*;

    let filter = if verbose {
        "punchclock=debug,punchclock_session=debug,punchclock_browser=debug,punchclock_client=debug,punchclock_server=debug,punchclock_config=debug,info"
    } else {
        "punchclock=info,punchclock_session=info,punchclock_browser=info,punchclock_client=info,punchclock_server=info,warn"
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::EnvFilter::new(filter));

    let appender = punchclock_config::log_dir(config_dir).and_then(|dir| {
        RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix("punchclock.log")
            .build(dir)
            .ok()
    });

    match appender {
        Some(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(console)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_filter(tracing_subscriber::EnvFilter::new(
                            "punchclock=trace,punchclock_session=trace,punchclock_browser=debug,punchclock_client=trace,punchclock_server=trace,punchclock_config=trace,info",
                        )),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(console).init();
            None
        }
    }
}
