//! Replies in the messenger's slash-command format.

use chrono::NaiveDate;
use punchclock_client::{AttendanceResult, Error as ClientError};
use punchclock_types::AttendanceType;
use serde::{Deserialize, Serialize};

const DEFAULT_USER: &str = "User";

/// `{"responseType": "ephemeral", "text": ...}`; only the caller sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub response_type: String,
    pub text: String,
}

impl Reply {
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: "ephemeral".to_string(),
            text: text.into(),
        }
    }

    /// Body that could not be parsed as a slash command.
    pub fn invalid_request(reason: impl std::fmt::Display) -> Self {
        Self::ephemeral(format!("Invalid request: {}", reason))
    }

    pub fn unknown_command(command: &str) -> Self {
        Self::ephemeral(format!(
            "Unknown command: {}\nAvailable: /출근 (/enter), /퇴근 (/leave)",
            command
        ))
    }

    /// Immediate answer when the outcome will follow through the callback URL.
    pub fn accepted(kind: AttendanceType, date: NaiveDate) -> Self {
        Self::ephemeral(format!("Processing {} for {}...", kind.label(), date))
    }

    /// Final answer for a completed request.
    pub fn outcome(
        kind: AttendanceType,
        date: NaiveDate,
        user: Option<&str>,
        outcome: &Result<AttendanceResult, ClientError>,
    ) -> Self {
        let user = user
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_USER);

        let text = match outcome {
            Ok(result) if result.is_successful => {
                format!("{}, your {} for {} is recorded.", user, kind.label(), date)
            }
            Ok(result) => format!(
                "{}, {} failed: {}",
                user,
                kind.label(),
                failure_reason(result)
            ),
            Err(e) => format!("{} could not be processed: {}", kind.label(), e),
        };
        Self::ephemeral(text)
    }
}

fn failure_reason(result: &AttendanceResult) -> String {
    if let Some(message) = &result.result_message {
        return message.clone();
    }
    if let Some(error) = &result.error {
        return error.clone();
    }
    match result.status_code {
        Some(status) => format!("HTTP {}", status),
        None => "unknown error".to_string(),
    }
}
