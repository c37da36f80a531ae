//! Request and result types for the attendance endpoint.

use chrono::NaiveDate;
use punchclock_types::AttendanceType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Longest body excerpt kept when a response is not JSON, in characters.
pub const RAW_EXCERPT_LIMIT: usize = 500;

/// Body of the attendance mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    /// Serialized as `YYYY-MM-DD`.
    pub base_date: NaiveDate,
    pub attendance_type: AttendanceType,
}

impl AttendanceRequest {
    pub fn new(base_date: NaiveDate, attendance_type: AttendanceType) -> Self {
        Self {
            base_date,
            attendance_type,
        }
    }
}

/// Normalised outcome of one attendance request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResult {
    pub is_successful: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_code: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_message: Option<String>,

    /// Set whenever the final HTTP status was not 200.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Parsed JSON body, or an excerpt of a non-JSON body.
    #[serde(default)]
    pub raw: Value,
}

impl AttendanceResult {
    /// A result for a request that produced no usable response.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Interpret a response body.
    ///
    /// The portal wraps outcomes in `{"header": {"isSuccessful", "resultCode",
    /// "resultMessage"}, ...}`. Bodies that are not JSON keep their first
    /// [`RAW_EXCERPT_LIMIT`] characters.
    pub fn from_response(status: u16, body: &str) -> Self {
        let mut result = match serde_json::from_str::<Value>(body) {
            Ok(json) => Self::from_json(json),
            Err(_) => Self {
                status_code: Some(status),
                error: Some("response is not valid JSON".to_string()),
                raw: Value::String(excerpt(body, RAW_EXCERPT_LIMIT)),
                ..Self::default()
            },
        };

        if status != 200 {
            result.status_code = Some(status);
        }
        result
    }

    fn from_json(json: Value) -> Self {
        let Some(header) = json.get("header").filter(|h| h.is_object()) else {
            return Self {
                error: Some("response has no result header".to_string()),
                raw: json,
                ..Self::default()
            };
        };

        Self {
            is_successful: header
                .get("isSuccessful")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            result_code: header.get("resultCode").and_then(Value::as_i64),
            result_message: header
                .get("resultMessage")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string),
            status_code: None,
            error: None,
            raw: json,
        }
    }

    /// One-line description for logs and replies.
    pub fn summary(&self) -> String {
        if self.is_successful {
            return match &self.result_message {
                Some(message) => format!("succeeded: {}", message),
                None => "succeeded".to_string(),
            };
        }

        let reason = self
            .error
            .as_deref()
            .or(self.result_message.as_deref())
            .unwrap_or("unknown error");
        match (self.status_code, self.result_code) {
            (Some(status), _) => format!("failed (HTTP {}): {}", status, reason),
            (None, Some(code)) => format!("failed (code {}): {}", code, reason),
            (None, None) => format!("failed: {}", reason),
        }
    }
}

/// First `limit` characters of `text`, never splitting a character.
pub(crate) fn excerpt(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
