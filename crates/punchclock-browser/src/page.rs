//! Page-level operations used by the login flow.
//!
//! [`PageDriver`] is the narrow surface the login flow needs.
//! [`ChromiumPage`] implements it with `chromiumoxide` on a browser reached
//! over its DevTools endpoint; tests implement it with a scripted fake.

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::storage::GetCookiesParams;
use chromiumoxide::{Browser, Element, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::error::{BrowserError, Result};

/// A cookie as reported by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

/// Operations on one open page.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate and wait until the new document has loaded.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Whether `selector` matches a visible, enabled element.
    async fn is_ready(&self, selector: &str) -> Result<bool>;

    /// Focus the element, clear it and type `value` into it.
    async fn fill(&self, selector: &str, value: &str) -> Result<()>;

    /// Click the element.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Current document URL.
    async fn current_url(&self) -> Result<String>;

    /// Every cookie held by the browser context.
    async fn cookies(&self) -> Result<Vec<BrowserCookie>>;
}

/// Visible and enabled, evaluated with the element as `this`.
const READY_FN: &str = "function() { \
     const style = window.getComputedStyle(this); \
     return !this.disabled && style.display !== 'none' && style.visibility !== 'hidden'; }";

const CLEAR_FN: &str = "function() { if ('value' in this) this.value = ''; }";

/// One blank page in a browser connected over DevTools.
///
/// The connection's event handler runs on its own task until
/// [`close`](Self::close).
pub struct ChromiumPage {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl std::fmt::Debug for ChromiumPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChromiumPage").finish_non_exhaustive()
    }
}

impl ChromiumPage {
    /// Connect to the browser-level DevTools URL and open a blank page.
    pub async fn connect(ws_url: &str) -> Result<Self> {
        let (browser, mut handler) = Browser::connect(ws_url)
            .await
            .map_err(|e| BrowserError::Connect(format!("{}: {}", ws_url, e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    trace!(error = %e, "DevTools handler event failed");
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler.abort();
                return Err(e.into());
            }
        };
        debug!("Page attached");

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Ask the browser to close and stop the event handler.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!(error = %e, "Browser.close did not complete cleanly");
        }
        self.handler.abort();
    }

    async fn element(&self, selector: &str) -> Result<Element> {
        self.page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::ElementNotFound(selector.to_string()))
    }
}

#[async_trait]
impl PageDriver for ChromiumPage {
    async fn goto(&self, url: &str) -> Result<()> {
        // Resolves once the navigated frame has fired its load event.
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation(format!("{}: {}", url, e)))?;
        Ok(())
    }

    async fn is_ready(&self, selector: &str) -> Result<bool> {
        let element = self.element(selector).await?;
        let returned = element.call_js_fn(READY_FN, false).await?;
        Ok(returned
            .result
            .value
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }

    async fn fill(&self, selector: &str, value: &str) -> Result<()> {
        let element = self.element(selector).await?;
        element.focus().await?;
        element.call_js_fn(CLEAR_FN, false).await?;
        element.type_str(value).await?;
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        self.element(selector).await?.click().await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn cookies(&self) -> Result<Vec<BrowserCookie>> {
        let response = self.browser.execute(GetCookiesParams::default()).await?;
        Ok(response
            .result
            .cookies
            .into_iter()
            .map(|cookie| BrowserCookie {
                name: cookie.name,
                value: cookie.value,
                domain: cookie.domain,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_functions_are_declarations() {
        for declaration in [READY_FN, CLEAR_FN] {
            assert!(declaration.starts_with("function() {"));
            assert!(declaration.ends_with('}'));
            assert!(declaration.contains("this"));
        }
    }

    #[tokio::test]
    async fn test_connect_to_closed_port_fails() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = ChromiumPage::connect(&format!("ws://127.0.0.1:{}/devtools/browser/x", port))
            .await
            .unwrap_err();
        assert!(matches!(err, BrowserError::Connect(_)));
    }
}
