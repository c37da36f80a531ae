//! Client for the portal's attendance endpoint.
//!
//! Every request reuses the cached portal session. When the portal rejects
//! it (401/403) the session is invalidated, re-acquired once and the request
//! is sent again; a second rejection is reported, never retried.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use punchclock_client::AttendanceClient;
//! use punchclock_session::SessionCache;
//!
//! # async fn example(cache: Arc<SessionCache>) -> punchclock_client::Result<()> {
//! let client = AttendanceClient::builder().build(cache)?;
//! let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
//! let result = client.enter(date).await?;
//! println!("{}", result.summary());
//! # Ok(())
//! # }
//! ```
//!
//! Only incomplete credentials surface as `Err`. Rejections, network
//! failures and unparseable bodies come back as an [`AttendanceResult`]
//! with `is_successful == false`.

mod client;
mod error;
mod types;

pub use client::{AttendanceClient, ClientBuilder, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use types::{AttendanceRequest, AttendanceResult, RAW_EXCERPT_LIMIT};
