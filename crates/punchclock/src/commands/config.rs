//! Config command - show the resolved configuration.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use punchclock_config::Settings;
use serde::Serialize;

use super::Context;
use crate::app;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also validate the settings and fail if any are missing
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Serialize)]
struct ConfigOutput {
    settings: Settings,
    sources: Vec<String>,
    env_overrides: Vec<&'static str>,
    warnings: Vec<String>,
    problems: Vec<String>,
}

/// Print the merged settings with the password masked.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    let (loaded, settings) = app::load(ctx)?;
    let validation = settings.validate();

    let output = ConfigOutput {
        settings: settings.masked(),
        sources: loaded
            .loaded_from()
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        env_overrides: loaded.env_overrides.clone(),
        warnings: loaded.warnings.clone(),
        problems: validation
            .as_ref()
            .err()
            .map(|e| vec![e.to_string()])
            .unwrap_or_default(),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_config(&output);
    }

    if args.check {
        validation?;
    }
    Ok(())
}

fn print_config(output: &ConfigOutput) {
    let dim = Style::new().dim();
    let s = &output.settings;
    let or_unset = |v: &str| {
        if v.is_empty() {
            "(unset)".to_string()
        } else {
            v.to_string()
        }
    };

    println!();
    println!("{}", style("Configuration").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("  {} {}", dim.apply_to("Subdomain:"), or_unset(&s.subdomain));
    println!("  {} {}", dim.apply_to("Username:"), or_unset(&s.username));
    println!("  {} {}", dim.apply_to("Password:"), or_unset(&s.password));
    println!("  {} {}", dim.apply_to("Portal:"), s.portal_domain);
    println!("  {} {}s", dim.apply_to("Session TTL:"), s.session_ttl.as_secs());
    println!("  {} {}s", dim.apply_to("Timeout:"), s.request_timeout.as_secs());
    println!(
        "  {} {}",
        dim.apply_to("Browser:"),
        s.browser_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(auto)".to_string())
    );
    println!("  {} {}", dim.apply_to("Headless:"), s.headless);
    println!("  {} {}", dim.apply_to("Bind:"), s.bind);

    println!();
    if output.sources.is_empty() {
        println!("  {}", dim.apply_to("No config files loaded"));
    }
    for source in &output.sources {
        println!("  {} {}", dim.apply_to("Loaded:"), source);
    }
    for var in &output.env_overrides {
        println!("  {} {}", dim.apply_to("Env:"), var);
    }
    for warning in &output.warnings {
        println!("  {} {}", style("⚠").yellow(), warning);
    }
    for problem in &output.problems {
        println!("  {} {}", style("✗").red(), problem);
    }
    println!();
}
