//! The portal's fixed login flow.
//!
//! Login page → subdomain → continue → username/password → submit →
//! tenant origin → collect cookies. Every wait is bounded by its own step
//! timeout; a step that never becomes ready fails the whole flow.

use std::time::Duration;

use async_trait::async_trait;
use punchclock_session::{Error, Result, SessionProvider};
use punchclock_types::{Credentials, DEFAULT_PORTAL_DOMAIN, Endpoints, SessionCookies};
use tracing::{debug, info, trace, warn};

use crate::launcher::{BrowserProcess, LaunchOptions};
use crate::page::{ChromiumPage, PageDriver};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// CSS selectors for the login UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSelectors {
    pub subdomain_input: String,
    pub continue_button: String,
    pub username_input: String,
    pub password_input: String,
    pub submit_button: String,
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            subdomain_input: "input[id=subdomain]".to_string(),
            continue_button: "button[type=button]".to_string(),
            username_input: "input[type=text]".to_string(),
            password_input: "input[type=password]".to_string(),
            submit_button: "button[type=submit]".to_string(),
        }
    }
}

/// Per-step time limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginTimeouts {
    /// Each page navigation.
    pub page_load: Duration,
    pub subdomain_field: Duration,
    pub continue_button: Duration,
    /// Username and password fields together.
    pub credential_fields: Duration,
    /// Waiting for the URL to change after submitting.
    pub post_submit: Duration,
    /// Extra wait when the URL did not change after submitting.
    pub fallback_delay: Duration,
}

impl Default for LoginTimeouts {
    fn default() -> Self {
        Self {
            page_load: Duration::from_secs(30),
            subdomain_field: Duration::from_secs(10),
            continue_button: Duration::from_secs(10),
            credential_fields: Duration::from_secs(15),
            post_submit: Duration::from_secs(15),
            fallback_delay: Duration::from_secs(3),
        }
    }
}

/// Run the login flow on an open page and return the session cookies.
pub async fn run_login_flow<P>(
    page: &P,
    credentials: &Credentials,
    endpoints: &Endpoints,
    selectors: &LoginSelectors,
    timeouts: &LoginTimeouts,
) -> Result<SessionCookies>
where
    P: PageDriver + ?Sized,
{
    goto_within(page, &endpoints.login_url, "login page", timeouts.page_load).await?;
    debug!(url = %endpoints.login_url, "Login page loaded");

    wait_until_ready(
        page,
        &[&selectors.subdomain_input],
        "subdomain field",
        timeouts.subdomain_field,
    )
    .await?;
    page.fill(&selectors.subdomain_input, &credentials.subdomain).await?;

    wait_until_ready(
        page,
        &[&selectors.continue_button],
        "continue button",
        timeouts.continue_button,
    )
    .await?;
    page.click(&selectors.continue_button).await?;

    wait_until_ready(
        page,
        &[&selectors.username_input, &selectors.password_input],
        "credential fields",
        timeouts.credential_fields,
    )
    .await?;
    page.fill(&selectors.username_input, &credentials.username).await?;
    page.fill(&selectors.password_input, &credentials.password).await?;

    let before = page.current_url().await?;
    page.click(&selectors.submit_button).await?;

    match wait_for_url_change(page, &before, timeouts.post_submit).await? {
        Some(url) => debug!(%url, "Navigated after login submit"),
        None => {
            debug!(
                delay_ms = timeouts.fallback_delay.as_millis() as u64,
                "No navigation after login submit, waiting before continuing"
            );
            tokio::time::sleep(timeouts.fallback_delay).await;
        }
    }

    // Visiting the tenant origin makes the portal issue the tenant cookies.
    match tokio::time::timeout(timeouts.page_load, page.goto(&endpoints.origin)).await {
        Ok(Ok(())) => debug!(origin = %endpoints.origin, "Tenant origin loaded"),
        Ok(Err(e)) => warn!(
            error = %e,
            "Tenant origin navigation failed, collecting cookies anyway"
        ),
        Err(_) => warn!(
            origin = %endpoints.origin,
            "Tenant origin did not finish loading, collecting cookies anyway"
        ),
    }

    let cookies = page.cookies().await?;
    if cookies.is_empty() {
        return Err(Error::CookieAcquisition(
            "browser holds no cookies after login".to_string(),
        ));
    }

    let session: SessionCookies = cookies
        .into_iter()
        .map(|cookie| (cookie.name, cookie.value))
        .collect();
    info!(
        cookie_count = session.len(),
        cookies = ?session.names().collect::<Vec<_>>(),
        "Portal login succeeded"
    );
    Ok(session)
}

async fn goto_within<P>(page: &P, url: &str, step: &str, timeout: Duration) -> Result<()>
where
    P: PageDriver + ?Sized,
{
    match tokio::time::timeout(timeout, page.goto(url)).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(step_timeout(step, timeout)),
    }
}

async fn wait_until_ready<P>(
    page: &P,
    selectors: &[&str],
    step: &str,
    timeout: Duration,
) -> Result<()>
where
    P: PageDriver + ?Sized,
{
    let poll = async {
        loop {
            if all_ready(page, selectors).await? {
                return Ok::<(), Error>(());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };

    match tokio::time::timeout(timeout, poll).await {
        Ok(result) => result,
        Err(_) => Err(step_timeout(step, timeout)),
    }
}

async fn all_ready<P>(page: &P, selectors: &[&str]) -> Result<bool>
where
    P: PageDriver + ?Sized,
{
    for selector in selectors {
        match page.is_ready(selector).await {
            Ok(true) => {}
            Ok(false) => return Ok(false),
            Err(e) if e.is_transient() => {
                trace!(%selector, error = %e, "Readiness check failed");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

/// Poll until the URL differs from `before`; `None` when the wait runs out.
async fn wait_for_url_change<P>(page: &P, before: &str, timeout: Duration) -> Result<Option<String>>
where
    P: PageDriver + ?Sized,
{
    let poll = async {
        loop {
            match page.current_url().await {
                Ok(url) if url != before => return Ok::<String, Error>(url),
                Ok(_) => {}
                Err(e) if e.is_transient() => trace!(error = %e, "URL check failed"),
                Err(e) => return Err(e.into()),
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    };

    match tokio::time::timeout(timeout, poll).await {
        Ok(result) => result.map(Some),
        Err(_) => Ok(None),
    }
}

fn step_timeout(step: &str, timeout: Duration) -> Error {
    Error::LoginTimeout {
        step: step.to_string(),
        timeout,
    }
}

// ============================================================================
// BrowserLogin
// ============================================================================

/// [`SessionProvider`] that logs in with a freshly launched headless browser.
#[derive(Debug, Clone)]
pub struct BrowserLogin {
    launch: LaunchOptions,
    portal_domain: String,
    selectors: LoginSelectors,
    timeouts: LoginTimeouts,
}

impl BrowserLogin {
    pub fn new(launch: LaunchOptions) -> Self {
        Self {
            launch,
            portal_domain: DEFAULT_PORTAL_DOMAIN.to_string(),
            selectors: LoginSelectors::default(),
            timeouts: LoginTimeouts::default(),
        }
    }

    pub fn with_portal_domain(mut self, portal_domain: impl Into<String>) -> Self {
        self.portal_domain = portal_domain.into();
        self
    }

    pub fn with_selectors(mut self, selectors: LoginSelectors) -> Self {
        self.selectors = selectors;
        self
    }

    pub fn with_timeouts(mut self, timeouts: LoginTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    async fn drive(
        &self,
        browser: &BrowserProcess,
        credentials: &Credentials,
        endpoints: &Endpoints,
    ) -> Result<SessionCookies> {
        let page = ChromiumPage::connect(browser.ws_url()).await?;

        let result =
            run_login_flow(&page, credentials, endpoints, &self.selectors, &self.timeouts).await;

        page.close().await;
        result
    }
}

#[async_trait]
impl SessionProvider for BrowserLogin {
    async fn login(&self, credentials: &Credentials) -> Result<SessionCookies> {
        let missing = credentials.missing_fields();
        if !missing.is_empty() {
            return Err(Error::Configuration(format!(
                "missing credentials: {}",
                missing.join(", ")
            )));
        }

        let endpoints = Endpoints::resolve_with_domain(&credentials.subdomain, &self.portal_domain);
        info!(subdomain = %credentials.subdomain, "Starting browser login");

        let browser = BrowserProcess::launch(&self.launch).await?;
        let result = self.drive(&browser, credentials, &endpoints).await;
        browser.shutdown().await;
        result
    }
}
