//! Slash-command webhook endpoints.
//!
//! Handlers always answer 200 with a [`Reply`]; malformed input and failed
//! requests are reported in the reply text.

use axum::{Json, body::Bytes, extract::State};
use chrono::NaiveDate;
use punchclock_types::AttendanceType;
use tracing::{info, warn};

use crate::command::{SlashCommand, parse_command};
use crate::reply::Reply;
use crate::state::AppState;

/// `POST /dooray`: one URL for every registered command.
pub async fn dooray_handler(State(state): State<AppState>, body: Bytes) -> Json<Reply> {
    let payload: SlashCommand = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "Rejected slash-command body");
            return Json(Reply::invalid_request(e));
        }
    };

    let command = payload.command_name();
    info!(
        command,
        user = payload.user_name.as_deref().unwrap_or_default(),
        text = payload.text.as_deref().unwrap_or_default(),
        "Slash command received"
    );

    match parse_command(command) {
        Some(kind) => Json(handle(state, kind, payload).await),
        None => Json(Reply::unknown_command(command)),
    }
}

/// `POST /enter`: slash command or plain call.
pub async fn enter_handler(State(state): State<AppState>, body: Bytes) -> Json<Reply> {
    Json(handle(state, AttendanceType::Enter, lenient_payload(&body)).await)
}

/// `POST /leave`: slash command or plain call.
pub async fn leave_handler(State(state): State<AppState>, body: Bytes) -> Json<Reply> {
    Json(handle(state, AttendanceType::Leave, lenient_payload(&body)).await)
}

/// Anything that is not a slash-command body means "today, anonymous".
fn lenient_payload(body: &[u8]) -> SlashCommand {
    serde_json::from_slice(body).unwrap_or_default()
}

async fn handle(state: AppState, kind: AttendanceType, payload: SlashCommand) -> Reply {
    let date = payload.base_date();
    let user = payload.user_name.clone();

    let Some(destination) = payload.response_url().map(str::to_string) else {
        return process(&state, kind, date, user.as_deref()).await;
    };

    tokio::spawn(async move {
        let reply = process(&state, kind, date, user.as_deref()).await;
        state.notifier.notify(&destination, &reply).await;
    });
    Reply::accepted(kind, date)
}

async fn process(
    state: &AppState,
    kind: AttendanceType,
    date: NaiveDate,
    user: Option<&str>,
) -> Reply {
    info!(
        kind = %kind,
        %date,
        user = user.unwrap_or("anonymous"),
        "Processing attendance request"
    );

    let outcome = state.attendance.request_attendance(date, kind).await;
    match &outcome {
        Ok(result) if result.is_successful => info!(kind = %kind, %date, "Attendance recorded"),
        Ok(result) => warn!(
            kind = %kind,
            %date,
            summary = %result.summary(),
            "Attendance not recorded"
        ),
        Err(e) => warn!(kind = %kind, error = %e, "Attendance request could not be made"),
    }

    Reply::outcome(kind, date, user, &outcome)
}
