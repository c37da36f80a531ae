//! Serve command - run the slash-command webhook server.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use punchclock_server::{AppState, HttpNotifier, Server, ServerConfig};
use tracing::info;

use super::Context;
use crate::app;

/// Arguments for the serve command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.bind)
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Disable per-request HTTP tracing
    #[arg(long)]
    pub no_request_log: bool,
}

/// Run the webhook server until interrupted.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    let (_, mut settings) = app::load(ctx)?;
    if let Some(bind) = args.bind {
        settings.bind = bind;
    }

    let client = app::build_client(&settings)?;
    let bind_address = settings.bind_addr()?;

    let config = ServerConfig::new()
        .with_bind_address(bind_address)
        .with_request_logging(!args.no_request_log);
    let state =
        AppState::new(Arc::new(client), config).with_notifier(Arc::new(HttpNotifier::new()?));

    info!(
        bind = %bind_address,
        subdomain = %settings.subdomain,
        session_ttl_secs = settings.session_ttl.as_secs(),
        "starting punchclock webhook server"
    );

    tokio::select! {
        result = Server::from_state(state).run() => result?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    Ok(())
}
