//! Browser-driven portal login.
//!
//! The portal only issues session cookies to a real browser that walks
//! through its login UI. This crate launches a headless Chromium, drives
//! it with `chromiumoxide` over the DevTools protocol and hands the
//! resulting cookies to the session cache.
//!
//! # Components
//!
//! - [`finder`] - locating a Chrome/Chromium executable
//! - [`launcher`] - spawning a throwaway headless browser
//! - [`page`] - the [`PageDriver`] seam and its Chromium implementation
//! - [`login`] - the fixed login flow and the [`BrowserLogin`] provider

pub mod error;
pub mod finder;
pub mod launcher;
pub mod login;
pub mod page;

pub use error::{BrowserError, Result};
pub use launcher::{BrowserProcess, DEFAULT_USER_AGENT, LaunchOptions};
pub use login::{BrowserLogin, LoginSelectors, LoginTimeouts, run_login_flow};
pub use page::{BrowserCookie, ChromiumPage, PageDriver};
