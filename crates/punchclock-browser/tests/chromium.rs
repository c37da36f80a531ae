//! Page driving against a real Chromium.
//!
//! Each test returns early when no Chrome/Chromium is installed. Pages are
//! served from a local axum router.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use punchclock_browser::finder::find_chrome_executable;
use punchclock_browser::{BrowserProcess, ChromiumPage, LaunchOptions, PageDriver};

async fn first_page() -> Html<&'static str> {
    Html(r#"<html><body><input id="first"></body></html>"#)
}

/// Slow enough that the previous document is still showing meanwhile.
async fn slow_page() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_millis(700)).await;
    (
        [(header::SET_COOKIE, "SESSION=abc; Path=/")],
        Html(concat!(
            r#"<html><body><input id="second">"#,
            r#"<button id="go" disabled>go</button></body></html>"#,
        )),
    )
}

async fn serve_pages() -> SocketAddr {
    let app = Router::new()
        .route("/first", get(first_page))
        .route("/second", get(slow_page));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn launch() -> Option<(BrowserProcess, ChromiumPage)> {
    let Some(executable) = find_chrome_executable() else {
        eprintln!("no Chrome/Chromium installed; skipping");
        return None;
    };
    let options = LaunchOptions::default()
        .with_executable(executable)
        .with_no_sandbox(true);
    let browser = BrowserProcess::launch(&options).await.unwrap();
    let page = ChromiumPage::connect(browser.ws_url()).await.unwrap();
    Some((browser, page))
}

#[tokio::test]
async fn test_goto_returns_after_the_new_document_loads() {
    let Some((browser, page)) = launch().await else {
        return;
    };
    let addr = serve_pages().await;

    page.goto(&format!("http://{}/first", addr)).await.unwrap();
    assert!(page.is_ready("#first").await.unwrap());

    page.goto(&format!("http://{}/second", addr)).await.unwrap();
    assert!(page.current_url().await.unwrap().ends_with("/second"));
    assert!(page.is_ready("#second").await.unwrap());
    assert!(!page.is_ready("#first").await.unwrap_or(false));

    page.close().await;
    browser.shutdown().await;
}

#[tokio::test]
async fn test_disabled_element_is_not_ready() {
    let Some((browser, page)) = launch().await else {
        return;
    };
    let addr = serve_pages().await;

    page.goto(&format!("http://{}/second", addr)).await.unwrap();
    assert!(!page.is_ready("#go").await.unwrap());

    page.close().await;
    browser.shutdown().await;
}

#[tokio::test]
async fn test_cookies_include_those_set_by_the_page() {
    let Some((browser, page)) = launch().await else {
        return;
    };
    let addr = serve_pages().await;

    page.goto(&format!("http://{}/second", addr)).await.unwrap();
    page.fill("#second", "alice").await.unwrap();

    let cookies = page.cookies().await.unwrap();
    assert!(
        cookies
            .iter()
            .any(|cookie| cookie.name == "SESSION" && cookie.value == "abc")
    );

    page.close().await;
    browser.shutdown().await;
}
