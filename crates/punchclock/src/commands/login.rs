//! Login command - run the browser login once and report the session.

use std::time::Instant;

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use punchclock_session::SessionProvider;
use serde::Serialize;
use tracing::info;

use super::Context;
use crate::app;

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headed: bool,
}

#[derive(Debug, Serialize)]
struct LoginOutput {
    subdomain: String,
    cookie_count: usize,
    cookie_names: Vec<String>,
    elapsed_ms: u128,
}

/// Run the login command.
///
/// Cookie values are never printed.
pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let (_, mut settings) = app::load(ctx)?;
    settings.validate()?;
    if args.headed {
        settings.headless = false;
    }

    let provider = app::build_provider(&settings);
    let started = Instant::now();
    let cookies = provider.login(&settings.credentials()).await?;
    let elapsed = started.elapsed();

    info!(
        cookie_count = cookies.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "login succeeded"
    );

    let output = LoginOutput {
        subdomain: settings.subdomain.clone(),
        cookie_count: cookies.len(),
        cookie_names: cookies.names().map(str::to_string).collect(),
        elapsed_ms: elapsed.as_millis(),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("Login succeeded").bold().green());
    println!("  {} {}", dim.apply_to("Tenant:"), output.subdomain);
    println!(
        "  {} {:.1}s",
        dim.apply_to("Elapsed:"),
        elapsed.as_secs_f64()
    );
    println!("  {} {}", dim.apply_to("Cookies:"), output.cookie_count);
    for name in &output.cookie_names {
        println!("    {}", name);
    }
    println!();
    Ok(())
}
