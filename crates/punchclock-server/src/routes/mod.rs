//! HTTP routes.

pub mod health;
pub mod webhook;

pub use health::{HealthResponse, health_routes};
pub use webhook::{dooray_handler, enter_handler, leave_handler};
