//! Delivery of deferred replies to the messenger's callback URL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::reply::Reply;

/// Timeout for one delivery attempt.
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends a reply somewhere outside the request that produced it.
///
/// Delivery is best-effort: implementations log failures and never
/// propagate them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, destination: &str, reply: &Reply);
}

/// Thread-safe notifier handle.
pub type SharedNotifier = Arc<dyn Notifier>;

/// Posts the reply as JSON to the destination URL.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    http: reqwest::Client,
}

impl HttpNotifier {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(NOTIFY_TIMEOUT).build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn notify(&self, destination: &str, reply: &Reply) {
        match self.http.post(destination).json(reply).send().await {
            Ok(response) if response.status().is_success() => {
                debug!(status = response.status().as_u16(), "Deferred reply delivered");
            }
            Ok(response) => warn!(
                status = response.status().as_u16(),
                "Callback URL rejected the deferred reply"
            ),
            Err(e) => warn!(error = %e, "Failed to deliver deferred reply"),
        }
    }
}

/// Discards every reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, destination: &str, _reply: &Reply) {
        debug!(%destination, "Dropping deferred reply");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_http_notifier_posts_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(body_json(serde_json::json!({
                "responseType": "ephemeral",
                "text": "done"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let notifier = HttpNotifier::new().unwrap();
        notifier
            .notify(&format!("{}/hook", server.uri()), &Reply::ephemeral("done"))
            .await;
    }

    #[tokio::test]
    async fn test_http_notifier_swallows_failures() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let notifier = HttpNotifier::new().unwrap();
        notifier.notify(&server.uri(), &Reply::ephemeral("x")).await;
        notifier
            .notify("http://127.0.0.1:1/unreachable", &Reply::ephemeral("x"))
            .await;
    }
}
