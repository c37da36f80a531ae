//! Webhook integration tests.
//!
//! Routes are exercised through `tower::ServiceExt::oneshot` against a
//! scripted attendance service and a notifier that records deliveries.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use punchclock_client::{AttendanceResult, Error as ClientError};
use punchclock_server::{
    AppState, AttendanceService, Notifier, Reply, Server, ServerConfig, today_in_seoul,
};
use punchclock_types::AttendanceType;
use tokio::sync::mpsc;
use tower::ServiceExt;

#[derive(Clone, Copy)]
enum Script {
    Succeed,
    Reject,
    MissingCredentials,
}

struct FakeAttendance {
    script: Script,
    calls: Mutex<Vec<(NaiveDate, AttendanceType)>>,
}

impl FakeAttendance {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(NaiveDate, AttendanceType)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl AttendanceService for FakeAttendance {
    async fn request_attendance(
        &self,
        date: NaiveDate,
        kind: AttendanceType,
    ) -> punchclock_client::Result<AttendanceResult> {
        self.calls.lock().push((date, kind));
        match self.script {
            Script::Succeed => Ok(AttendanceResult {
                is_successful: true,
                result_code: Some(0),
                ..AttendanceResult::default()
            }),
            Script::Reject => Ok(AttendanceResult {
                result_code: Some(-100),
                result_message: Some("already clocked in".to_string()),
                ..AttendanceResult::default()
            }),
            Script::MissingCredentials => Err(ClientError::Config(
                "missing credentials: password".to_string(),
            )),
        }
    }
}

struct RecordingNotifier {
    tx: mpsc::UnboundedSender<(String, Reply)>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, destination: &str, reply: &Reply) {
        let _ = self.tx.send((destination.to_string(), reply.clone()));
    }
}

struct Harness {
    attendance: Arc<FakeAttendance>,
    deliveries: mpsc::UnboundedReceiver<(String, Reply)>,
    router: axum::Router,
}

impl Harness {
    fn new(script: Script) -> Self {
        let attendance = FakeAttendance::new(script);
        let (tx, deliveries) = mpsc::unbounded_channel();
        let state = AppState::new(
            attendance.clone(),
            ServerConfig::new().with_request_logging(false),
        )
        .with_notifier(Arc::new(RecordingNotifier { tx }));

        Self {
            attendance,
            deliveries,
            router: Server::from_state(state).router(),
        }
    }

    async fn post(&self, uri: &str, body: impl Into<Body>) -> Result<Reply> {
        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(body.into())?,
            )
            .await?;
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_health_reports_ok() -> Result<()> {
    let h = Harness::new(Script::Succeed);
    let response = h
        .router
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(json["ok"], true);
    Ok(())
}

#[tokio::test]
async fn test_korean_enter_command_with_date() -> Result<()> {
    let h = Harness::new(Script::Succeed);
    let reply = h
        .post(
            "/dooray",
            r#"{"command":"/출근","text":"2026-01-05","userName":"alice"}"#,
        )
        .await?;

    assert_eq!(reply.response_type, "ephemeral");
    assert_eq!(reply.text, "alice, your clock-in for 2026-01-05 is recorded.");
    assert_eq!(
        h.attendance.calls(),
        vec![(date(2026, 1, 5), AttendanceType::Enter)]
    );
    Ok(())
}

#[tokio::test]
async fn test_leave_command_defaults_to_today() -> Result<()> {
    let h = Harness::new(Script::Succeed);
    let before = today_in_seoul(Utc::now());
    h.post("/dooray", r#"{"command":"/leave","text":"bye"}"#).await?;
    let after = today_in_seoul(Utc::now());

    let calls = h.attendance.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, AttendanceType::Leave);
    assert!(calls[0].0 == before || calls[0].0 == after);
    Ok(())
}

#[tokio::test]
async fn test_unknown_command_is_not_dispatched() -> Result<()> {
    let h = Harness::new(Script::Succeed);
    let reply = h.post("/dooray", r#"{"command":"/lunch"}"#).await?;

    assert!(reply.text.starts_with("Unknown command: /lunch"));
    assert!(h.attendance.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_invalid_body_gets_invalid_request_reply() -> Result<()> {
    let h = Harness::new(Script::Succeed);
    let reply = h.post("/dooray", "not json").await?;

    assert!(reply.text.starts_with("Invalid request"));
    assert!(h.attendance.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_direct_endpoints_tolerate_any_body() -> Result<()> {
    let h = Harness::new(Script::Succeed);
    let reply = h.post("/enter", "").await?;
    assert_eq!(
        reply.text,
        format!("User, your clock-in for {} is recorded.", h.attendance.calls()[0].0)
    );

    h.post("/leave", r#"{"text":"2026-02-27","userName":"bob"}"#).await?;
    assert_eq!(
        h.attendance.calls()[1],
        (date(2026, 2, 27), AttendanceType::Leave)
    );
    Ok(())
}

#[tokio::test]
async fn test_portal_rejection_is_reported() -> Result<()> {
    let h = Harness::new(Script::Reject);
    let reply = h.post("/dooray", r#"{"command":"/enter","userName":"alice"}"#).await?;
    assert_eq!(reply.text, "alice, clock-in failed: already clocked in");
    Ok(())
}

#[tokio::test]
async fn test_configuration_error_is_reported() -> Result<()> {
    let h = Harness::new(Script::MissingCredentials);
    let reply = h.post("/enter", "{}").await?;
    assert!(reply.text.contains("missing credentials"));
    Ok(())
}

#[tokio::test]
async fn test_response_url_defers_the_outcome() -> Result<()> {
    let mut h = Harness::new(Script::Succeed);
    let reply = h
        .post(
            "/dooray",
            r#"{"command":"/퇴근","text":"2026-01-05","userName":"alice","responseUrl":"https://hooks.example/r/1"}"#,
        )
        .await?;
    assert_eq!(reply.text, "Processing clock-out for 2026-01-05...");

    let (destination, delivered) =
        tokio::time::timeout(Duration::from_secs(5), h.deliveries.recv())
            .await?
            .expect("notifier dropped");
    assert_eq!(destination, "https://hooks.example/r/1");
    assert_eq!(delivered.text, "alice, your clock-out for 2026-01-05 is recorded.");
    assert_eq!(
        h.attendance.calls(),
        vec![(date(2026, 1, 5), AttendanceType::Leave)]
    );
    Ok(())
}

#[tokio::test]
async fn test_inline_reply_does_not_notify() -> Result<()> {
    let mut h = Harness::new(Script::Succeed);
    h.post("/dooray", r#"{"command":"/enter"}"#).await?;
    assert!(h.deliveries.try_recv().is_err());
    Ok(())
}
