//! Shared types for the punchclock attendance client.
//!
//! Everything here is plain data: the portal endpoints derived from a
//! tenant subdomain, login credentials, the cookie set of an authenticated
//! session, and the attendance direction.

pub mod attendance;
pub mod cookies;
pub mod credentials;
pub mod endpoints;

pub use attendance::AttendanceType;
pub use cookies::SessionCookies;
pub use credentials::Credentials;
pub use endpoints::{DEFAULT_PORTAL_DOMAIN, Endpoints};
