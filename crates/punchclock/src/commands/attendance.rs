//! Enter/leave commands - record a clock-in or clock-out.

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use clap::Args;
use console::{Style, style};
use punchclock_client::AttendanceResult;
use punchclock_server::today_in_seoul;
use punchclock_types::AttendanceType;
use serde::Serialize;

use super::Context;
use crate::app;

/// Arguments for the enter and leave commands.
#[derive(Args, Debug)]
pub struct AttendanceArgs {
    /// Attendance date as YYYY-MM-DD (default: today in Asia/Seoul)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttendanceOutput<'a> {
    attendance_type: AttendanceType,
    base_date: NaiveDate,
    #[serde(flatten)]
    result: &'a AttendanceResult,
}

/// Run an attendance command.
pub async fn run(kind: AttendanceType, args: AttendanceArgs, ctx: &Context) -> Result<()> {
    let (_, settings) = app::load(ctx)?;
    let client = app::build_client(&settings)?;

    let date = args.date.unwrap_or_else(|| today_in_seoul(Utc::now()));
    let result = client.request_attendance(date, kind).await?;

    if ctx.json_output {
        let output = AttendanceOutput {
            attendance_type: kind,
            base_date: date,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_result(kind, date, &result, ctx.verbose)?;
    }

    if !result.is_successful {
        bail!("{} for {} {}", kind.label(), date, result.summary());
    }
    Ok(())
}

fn print_result(
    kind: AttendanceType,
    date: NaiveDate,
    result: &AttendanceResult,
    verbose: bool,
) -> Result<()> {
    let dim = Style::new().dim();

    let status = if result.is_successful {
        Style::new().green().apply_to("● recorded")
    } else {
        Style::new().red().apply_to("✗ failed")
    };

    println!();
    println!("{} {}", style(kind.label()).bold(), dim.apply_to(date));
    println!("  {} {}", dim.apply_to("Status:"), status);
    if let Some(code) = result.result_code {
        println!("  {} {}", dim.apply_to("Code:"), code);
    }
    if let Some(message) = &result.result_message {
        println!("  {} {}", dim.apply_to("Message:"), message);
    }
    if let Some(status_code) = result.status_code {
        println!("  {} {}", dim.apply_to("HTTP:"), status_code);
    }
    if let Some(error) = &result.error {
        println!("  {} {}", dim.apply_to("Error:"), error);
    }
    if verbose {
        println!();
        println!("{}", serde_json::to_string_pretty(&result.raw)?);
    }
    println!();
    Ok(())
}
