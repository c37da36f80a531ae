//! Attendance client implementation.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use punchclock_session::SessionCache;
use punchclock_types::{AttendanceType, Endpoints, SessionCookies};
use reqwest::StatusCode;
use reqwest::header::{COOKIE, ORIGIN, REFERER};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::types::{AttendanceRequest, AttendanceResult};

/// Default timeout for attendance requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a request stands in its auth handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    /// First try, with whatever session the cache holds.
    UsingCache,
    /// Second and last try, after invalidating and re-acquiring the session.
    Retrying,
}

/// Attendance API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the session
/// cache.
#[derive(Clone)]
pub struct AttendanceClient {
    http: reqwest::Client,
    cache: Arc<SessionCache>,
    endpoints: Endpoints,
    timeout: Duration,
}

impl AttendanceClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn cache(&self) -> &Arc<SessionCache> {
        &self.cache
    }

    /// Clock in for `date`.
    pub async fn enter(&self, date: NaiveDate) -> Result<AttendanceResult> {
        self.request_attendance(date, AttendanceType::Enter).await
    }

    /// Clock out for `date`.
    pub async fn leave(&self, date: NaiveDate) -> Result<AttendanceResult> {
        self.request_attendance(date, AttendanceType::Leave).await
    }

    /// Record attendance for `date`.
    ///
    /// Returns `Err` only for incomplete credentials, before any login or
    /// HTTP call. Everything else is reported in the result.
    pub async fn request_attendance(
        &self,
        date: NaiveDate,
        attendance_type: AttendanceType,
    ) -> Result<AttendanceResult> {
        let missing = self.cache.credentials().missing_fields();
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing credentials: {}",
                missing.join(", ")
            )));
        }

        let request = AttendanceRequest::new(date, attendance_type);
        info!(
            kind = %attendance_type,
            date = %date,
            url = %self.endpoints.attendance_url,
            "Submitting attendance"
        );

        let mut attempt = Attempt::UsingCache;
        loop {
            let cookies = match self.cache.get(attempt == Attempt::Retrying).await {
                Ok(cookies) => cookies,
                Err(e) => {
                    warn!(error = %e, ?attempt, "Could not obtain a portal session");
                    return Ok(AttendanceResult::failure(format!("login failed: {}", e)));
                }
            };

            let response = match self.send(&request, &cookies).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "Attendance request failed");
                    return Ok(AttendanceResult::failure(describe_transport_error(&e)));
                }
            };

            let status = response.status();
            info!(status = status.as_u16(), ?attempt, "Attendance response");

            if !is_auth_rejection(status) {
                return Ok(read_result(response).await);
            }

            match attempt {
                Attempt::UsingCache => {
                    info!(
                        status = status.as_u16(),
                        "Session rejected, re-acquiring and retrying once"
                    );
                    self.cache.invalidate();
                    attempt = Attempt::Retrying;
                }
                Attempt::Retrying => {
                    warn!(status = status.as_u16(), "Session rejected again after re-login");
                    let mut result = read_result(response).await;
                    result.is_successful = false;
                    result.error = Some(format!(
                        "request rejected with HTTP {} after re-login",
                        status.as_u16()
                    ));
                    return Ok(result);
                }
            }
        }
    }

    async fn send(
        &self,
        request: &AttendanceRequest,
        cookies: &SessionCookies,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        debug!(cookies = ?cookies.names().collect::<Vec<_>>(), "Posting attendance");
        self.http
            .post(&self.endpoints.attendance_url)
            .json(request)
            .header(COOKIE, cookies.header_value())
            .header(ORIGIN, &self.endpoints.origin)
            .header(REFERER, self.endpoints.referer())
            .timeout(self.timeout)
            .send()
            .await
    }
}

impl std::fmt::Debug for AttendanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttendanceClient")
            .field("endpoints", &self.endpoints)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn is_auth_rejection(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

async fn read_result(response: reqwest::Response) -> AttendanceResult {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => AttendanceResult::from_response(status, &body),
        Err(e) => {
            let mut result =
                AttendanceResult::failure(format!("failed to read response body: {}", e));
            result.status_code = Some(status);
            result
        }
    }
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        format!("request failed: {}", e)
    }
}

/// Builder for [`AttendanceClient`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    endpoints: Option<Endpoints>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            endpoints: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Endpoints to call. Resolved from the cache's subdomain when unset.
    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = Some(endpoints);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a client that takes its sessions from `cache`.
    pub fn build(self, cache: Arc<SessionCache>) -> Result<AttendanceClient> {
        let endpoints = self
            .endpoints
            .unwrap_or_else(|| Endpoints::resolve(&cache.credentials().subdomain));
        Url::parse(&endpoints.attendance_url)?;
        Url::parse(&endpoints.origin)?;

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("punchclock/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(AttendanceClient {
            http,
            cache,
            endpoints,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use punchclock_session::CacheConfig;
    use punchclock_session::testing::ScriptedProvider;
    use punchclock_types::Credentials;

    fn cache(credentials: Credentials) -> Arc<SessionCache> {
        Arc::new(SessionCache::new(
            credentials,
            Arc::new(ScriptedProvider::new()),
            CacheConfig::default(),
        ))
    }

    #[test]
    fn test_builder_resolves_endpoints_from_subdomain() {
        let client = AttendanceClient::builder()
            .build(cache(Credentials::new("acme", "alice", "secret")))
            .unwrap();
        assert_eq!(client.endpoints().origin, "https://acme.dooray.com");
    }

    #[test]
    fn test_builder_rejects_malformed_origin() {
        let err = AttendanceClient::builder()
            .endpoints(Endpoints::from_origin("https://dooray.com/orgs", "not a url"))
            .build(cache(Credentials::new("acme", "alice", "secret")))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_auth_rejection_statuses() {
        assert!(is_auth_rejection(StatusCode::UNAUTHORIZED));
        assert!(is_auth_rejection(StatusCode::FORBIDDEN));
        assert!(!is_auth_rejection(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_auth_rejection(StatusCode::OK));
    }
}
