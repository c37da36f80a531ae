//! Slash-command webhook server for punchclock.
//!
//! Exposes the attendance client to a team messenger:
//!
//! - `GET /health`
//! - `POST /dooray`: `/출근` / `/enter` and `/퇴근` / `/leave` commands
//! - `POST /enter`, `POST /leave`: direct calls, any body
//!
//! A date in the command text (`YYYY-MM-DD`) selects the day; otherwise
//! today in Asia/Seoul is used. When the payload carries a `responseUrl`
//! the handler acknowledges at once and posts the outcome there later.

pub mod command;
pub mod config;
pub mod error;
pub mod notify;
pub mod reply;
pub mod routes;
pub mod state;

pub use command::{SlashCommand, extract_date, parse_command, today_in_seoul};
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use notify::{HttpNotifier, NoopNotifier, Notifier, SharedNotifier};
pub use reply::Reply;
pub use state::{AppState, AttendanceService, SharedAttendanceService};

use std::net::SocketAddr;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The punchclock webhook server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a server from a pre-built application state.
    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        let router = Router::new()
            .merge(routes::health_routes())
            .route("/dooray", post(routes::dooray_handler))
            .route("/enter", post(routes::enter_handler))
            .route("/leave", post(routes::leave_handler))
            .layer(DefaultBodyLimit::max(self.state.config.max_body_size));

        let router = if self.state.config.request_logging {
            router.layer(TraceLayer::new_for_http())
        } else {
            router
        };

        router.with_state(self.state.clone())
    }

    /// Run the server until the process is stopped.
    pub async fn run(self) -> Result<()> {
        let addr = self.bind_address();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener (useful for testing).
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let router = self.router();
        let addr = listener
            .local_addr()
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        info!("Starting webhook server on {}", addr);

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }
}
