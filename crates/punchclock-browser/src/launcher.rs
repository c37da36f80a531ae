//! Headless browser process management.
//!
//! Each login gets its own browser with a throwaway profile directory. The
//! DevTools endpoint is read from the browser's stderr, which it prints as
//! `DevTools listening on ws://…` once `--remote-debugging-port=0` has
//! picked a port.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, info, trace};

use crate::error::{BrowserError, Result};
use crate::finder::find_chrome_executable;

/// User agent presented to the portal.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";

const DEVTOOLS_PREFIX: &str = "DevTools listening on ";

/// How to start the browser.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Explicit executable; discovered when `None`.
    pub executable: Option<PathBuf>,
    /// Run without a window.
    pub headless: bool,
    /// Pass `--no-sandbox` (needed in some containers).
    pub no_sandbox: bool,
    pub user_agent: String,
    pub window_size: (u32, u32),
    /// Time allowed for the DevTools endpoint to appear.
    pub startup_timeout: Duration,
    /// Extra command-line flags.
    pub extra_args: Vec<String>,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            no_sandbox: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            window_size: (1280, 800),
            startup_timeout: Duration::from_secs(15),
            extra_args: Vec::new(),
        }
    }
}

impl LaunchOptions {
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_no_sandbox(mut self, no_sandbox: bool) -> Self {
        self.no_sandbox = no_sandbox;
        self
    }

    /// Command-line flags for a launch using `profile_dir`.
    pub fn args(&self, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "--remote-debugging-port=0".to_string(),
            format!("--user-data-dir={}", profile_dir.display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-blink-features=AutomationControlled".to_string(),
            format!("--window-size={},{}", self.window_size.0, self.window_size.1),
            format!("--user-agent={}", self.user_agent),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }
        if self.no_sandbox {
            args.push("--no-sandbox".to_string());
        }
        args.extend(self.extra_args.iter().cloned());
        args.push("about:blank".to_string());
        args
    }
}

/// A running browser. Killed when dropped.
#[derive(Debug)]
pub struct BrowserProcess {
    child: Child,
    ws_url: String,
    _profile: TempDir,
}

impl BrowserProcess {
    /// Start a browser and wait for its DevTools endpoint.
    pub async fn launch(options: &LaunchOptions) -> Result<Self> {
        let executable = match &options.executable {
            Some(path) => path.clone(),
            None => find_chrome_executable().ok_or(BrowserError::ExecutableNotFound)?,
        };

        let profile = tempfile::Builder::new()
            .prefix("punchclock-profile-")
            .tempdir()
            .map_err(|e| BrowserError::Launch(format!("failed to create profile dir: {}", e)))?;

        let mut child = Command::new(&executable)
            .args(options.args(profile.path()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                BrowserError::Launch(format!("{}: {}", executable.display(), e))
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| BrowserError::Launch("browser stderr was not captured".to_string()))?;
        let mut lines = BufReader::new(stderr).lines();

        let ws_url =
            match tokio::time::timeout(options.startup_timeout, read_devtools_url(&mut lines))
                .await
            {
                Ok(Ok(url)) => url,
                Ok(Err(e)) => {
                    let _ = child.kill().await;
                    return Err(e);
                }
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(BrowserError::StartupTimeout(options.startup_timeout));
                }
            };

        // Keep draining so the browser never blocks on a full pipe.
        tokio::spawn(async move {
            while let Ok(Some(line)) = lines.next_line().await {
                trace!(target: "punchclock_browser::stderr", "{}", line);
            }
        });

        info!(
            pid = child.id(),
            executable = %executable.display(),
            "Browser launched"
        );

        Ok(Self {
            child,
            ws_url,
            _profile: profile,
        })
    }

    /// Browser-level DevTools WebSocket URL.
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Wait briefly for the process to exit, then kill it.
    pub async fn shutdown(mut self) {
        match tokio::time::timeout(Duration::from_secs(2), self.child.wait()).await {
            Ok(Ok(status)) => debug!(%status, "Browser exited"),
            _ => {
                let _ = self.child.kill().await;
                debug!("Browser killed");
            }
        }
    }
}

async fn read_devtools_url(lines: &mut Lines<BufReader<ChildStderr>>) -> Result<String> {
    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BrowserError::Launch(format!("failed to read browser output: {}", e)))?
    {
        if let Some(url) = parse_devtools_line(&line) {
            return Ok(url.to_string());
        }
        trace!(target: "punchclock_browser::stderr", "{}", line);
    }
    Err(BrowserError::Launch(
        "browser exited before exposing a DevTools endpoint".to_string(),
    ))
}

/// Extract the WebSocket URL from a `DevTools listening on …` line.
pub(crate) fn parse_devtools_line(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix(DEVTOOLS_PREFIX)
        .map(str::trim)
        .filter(|url| url.starts_with("ws://") || url.starts_with("wss://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_devtools_line() {
        let line = "DevTools listening on ws://127.0.0.1:41235/devtools/browser/3b1c-42\n";
        assert_eq!(
            parse_devtools_line(line),
            Some("ws://127.0.0.1:41235/devtools/browser/3b1c-42")
        );
    }

    #[test]
    fn test_parse_devtools_line_ignores_noise() {
        assert_eq!(parse_devtools_line("[0101/000000.000:ERROR:gpu] oops"), None);
        assert_eq!(parse_devtools_line("DevTools listening on nowhere"), None);
    }

    #[test]
    fn test_args_default_headless_sandboxed() {
        let args = LaunchOptions::default().args(Path::new("/tmp/profile"));
        assert!(args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
        assert!(args.contains(&"--window-size=1280,800".to_string()));
        assert!(!args.contains(&"--no-sandbox".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("about:blank"));
    }

    #[test]
    fn test_args_with_options() {
        let options = LaunchOptions::default()
            .with_headless(false)
            .with_no_sandbox(true);
        let args = options.args(Path::new("/tmp/p"));
        assert!(!args.contains(&"--headless=new".to_string()));
        assert!(args.contains(&"--no-sandbox".to_string()));
    }

    #[tokio::test]
    async fn test_launch_missing_executable_fails() {
        let options = LaunchOptions::default().with_executable("/definitely/not/a/browser");
        let err = BrowserProcess::launch(&options).await.unwrap_err();
        assert!(matches!(err, BrowserError::Launch(_)));
    }
}
