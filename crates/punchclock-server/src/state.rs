//! Application state shared across handlers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use punchclock_client::{AttendanceClient, AttendanceResult};
use punchclock_types::AttendanceType;

use crate::config::ServerConfig;
use crate::notify::{NoopNotifier, SharedNotifier};

/// What the webhook needs from the attendance layer.
#[async_trait]
pub trait AttendanceService: Send + Sync {
    async fn request_attendance(
        &self,
        date: NaiveDate,
        kind: AttendanceType,
    ) -> punchclock_client::Result<AttendanceResult>;
}

#[async_trait]
impl AttendanceService for AttendanceClient {
    async fn request_attendance(
        &self,
        date: NaiveDate,
        kind: AttendanceType,
    ) -> punchclock_client::Result<AttendanceResult> {
        AttendanceClient::request_attendance(self, date, kind).await
    }
}

/// Thread-safe attendance service handle.
pub type SharedAttendanceService = Arc<dyn AttendanceService>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub attendance: SharedAttendanceService,

    /// Delivers replies for requests that carried a callback URL.
    pub notifier: SharedNotifier,

    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state that drops deferred replies.
    pub fn new(attendance: SharedAttendanceService, config: ServerConfig) -> Self {
        Self {
            attendance,
            notifier: Arc::new(NoopNotifier),
            config: Arc::new(config),
        }
    }

    /// Deliver deferred replies through `notifier`.
    pub fn with_notifier(mut self, notifier: SharedNotifier) -> Self {
        self.notifier = notifier;
        self
    }
}
