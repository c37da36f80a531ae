//! Slash-command payloads and their interpretation.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use punchclock_types::AttendanceType;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Offset of Asia/Seoul from UTC. Korea observes no daylight saving time.
const SEOUL_UTC_OFFSET_HOURS: i64 = 9;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("date pattern is valid"));

/// Body the messenger posts when a user runs a slash command.
///
/// Every field is optional; direct calls may send any subset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlashCommand {
    pub tenant_id: Option<String>,
    pub tenant_domain: Option<String>,
    pub channel_id: Option<String>,
    pub channel_name: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub command: Option<String>,
    pub text: Option<String>,
    pub response_url: Option<String>,
    pub app_token: Option<String>,
    pub cmd_token: Option<String>,
    pub trigger_id: Option<String>,
}

impl SlashCommand {
    /// Trimmed command name, empty when absent.
    pub fn command_name(&self) -> &str {
        self.command.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Callback URL for a deferred reply, if one was given.
    pub fn response_url(&self) -> Option<&str> {
        self.response_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Date named in the command text, or today in Seoul.
    pub fn base_date(&self) -> NaiveDate {
        extract_date(self.text.as_deref()).unwrap_or_else(|| today_in_seoul(Utc::now()))
    }
}

/// Map a command name to an attendance direction.
pub fn parse_command(command: &str) -> Option<AttendanceType> {
    match command.trim() {
        "/출근" | "/enter" => Some(AttendanceType::Enter),
        "/퇴근" | "/leave" => Some(AttendanceType::Leave),
        _ => None,
    }
}

/// First valid `YYYY-MM-DD` date in `text`.
///
/// Matches that are not real calendar dates (`2026-13-40`) are skipped.
pub fn extract_date(text: Option<&str>) -> Option<NaiveDate> {
    DATE_PATTERN
        .find_iter(text?.trim())
        .find_map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
}

/// Calendar date in Asia/Seoul at instant `now`.
pub fn today_in_seoul(now: DateTime<Utc>) -> NaiveDate {
    (now.naive_utc() + TimeDelta::hours(SEOUL_UTC_OFFSET_HOURS)).date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("/출근"), Some(AttendanceType::Enter));
        assert_eq!(parse_command(" /enter "), Some(AttendanceType::Enter));
        assert_eq!(parse_command("/퇴근"), Some(AttendanceType::Leave));
        assert_eq!(parse_command("/leave"), Some(AttendanceType::Leave));
        assert_eq!(parse_command("/lunch"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_extract_date() {
        assert_eq!(
            extract_date(Some("  for 2026-01-05 please ")),
            NaiveDate::from_ymd_opt(2026, 1, 5)
        );
        assert_eq!(
            extract_date(Some("2026-13-40 then 2026-02-01")),
            NaiveDate::from_ymd_opt(2026, 2, 1)
        );
        assert_eq!(extract_date(Some("tomorrow")), None);
        assert_eq!(extract_date(None), None);
    }

    #[test]
    fn test_today_in_seoul_crosses_midnight() {
        // 15:30 UTC is 00:30 the next day in Seoul.
        let now = Utc.with_ymd_and_hms(2026, 1, 4, 15, 30, 0).unwrap();
        assert_eq!(today_in_seoul(now), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());

        let now = Utc.with_ymd_and_hms(2026, 1, 4, 14, 59, 0).unwrap();
        assert_eq!(today_in_seoul(now), NaiveDate::from_ymd_opt(2026, 1, 4).unwrap());
    }

    #[test]
    fn test_payload_is_camel_case_and_lenient() {
        let payload: SlashCommand = serde_json::from_str(
            r#"{"command":"/출근","userName":"alice","responseUrl":" ","extra":1}"#,
        )
        .unwrap();
        assert_eq!(payload.command_name(), "/출근");
        assert_eq!(payload.user_name.as_deref(), Some("alice"));
        assert_eq!(payload.response_url(), None);
    }
}
