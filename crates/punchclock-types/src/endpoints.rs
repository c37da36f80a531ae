//! Portal endpoint resolution.

/// Portal domain used when none is configured.
pub const DEFAULT_PORTAL_DOMAIN: &str = "dooray.com";

/// Path of the attendance mutation endpoint, relative to the tenant origin.
const ATTENDANCE_PATH: &str = "/wapi/work-schedule/v1/working-times";

/// URLs needed to log in to a tenant and call its attendance API.
///
/// Derived once from the tenant subdomain and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Entry page of the browser login flow.
    pub login_url: String,
    /// Tenant origin, e.g. `https://acme.dooray.com`.
    pub origin: String,
    /// Attendance mutation endpoint.
    pub attendance_url: String,
}

impl Endpoints {
    /// Resolve endpoints for `subdomain` on the default portal domain.
    pub fn resolve(subdomain: &str) -> Self {
        Self::resolve_with_domain(subdomain, DEFAULT_PORTAL_DOMAIN)
    }

    /// Resolve endpoints for `subdomain` on `portal_domain`.
    pub fn resolve_with_domain(subdomain: &str, portal_domain: &str) -> Self {
        let subdomain = subdomain.trim();
        let portal_domain = portal_domain.trim().trim_matches('.');
        Self::from_origin(
            format!("https://{}/orgs", portal_domain),
            format!("https://{}.{}", subdomain, portal_domain),
        )
    }

    /// Build endpoints for an explicit origin.
    ///
    /// A trailing slash on `origin` is dropped.
    pub fn from_origin(login_url: impl Into<String>, origin: impl Into<String>) -> Self {
        let origin = origin.into().trim_end_matches('/').to_string();
        Self {
            login_url: login_url.into(),
            attendance_url: format!("{}{}", origin, ATTENDANCE_PATH),
            origin,
        }
    }

    /// Value for the `Referer` header: the origin with a trailing slash.
    pub fn referer(&self) -> String {
        format!("{}/", self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default_domain() {
        let endpoints = Endpoints::resolve("acme");
        assert_eq!(endpoints.login_url, "https://dooray.com/orgs");
        assert_eq!(endpoints.origin, "https://acme.dooray.com");
        assert_eq!(
            endpoints.attendance_url,
            "https://acme.dooray.com/wapi/work-schedule/v1/working-times"
        );
    }

    #[test]
    fn test_resolve_custom_domain() {
        let endpoints = Endpoints::resolve_with_domain(" acme ", "example.org.");
        assert_eq!(endpoints.login_url, "https://example.org/orgs");
        assert_eq!(endpoints.origin, "https://acme.example.org");
    }

    #[test]
    fn test_from_origin_strips_trailing_slash() {
        let endpoints = Endpoints::from_origin("http://127.0.0.1:9/login", "http://127.0.0.1:9/");
        assert_eq!(endpoints.origin, "http://127.0.0.1:9");
        assert_eq!(
            endpoints.attendance_url,
            "http://127.0.0.1:9/wapi/work-schedule/v1/working-times"
        );
        assert_eq!(endpoints.referer(), "http://127.0.0.1:9/");
    }
}
