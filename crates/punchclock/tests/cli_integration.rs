//! CLI integration tests for the punchclock command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Configuration is resolved and masked without a browser or network
//!
//! Note: no test here logs in or contacts a portal.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const DOORAY_VARS: [&str; 4] = [
    "DOORAY_SUBDOMAIN",
    "DOORAY_LOGIN_USERNAME",
    "DOORAY_LOGIN_PASSWORD",
    "DOORAY_PORTAL_DOMAIN",
];

/// Get a command for the punchclock binary.
fn punchclock() -> Command {
    Command::cargo_bin("punchclock").unwrap()
}

/// A command isolated from the caller's config and environment.
fn isolated(config_dir: &TempDir, cwd: &TempDir) -> Command {
    let mut cmd = punchclock();
    for var in DOORAY_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("PUNCHCLOCK_BIND")
        .env_remove("PUNCHCLOCK_BROWSER_PATH")
        .env("PUNCHCLOCK_CONFIG_DIR", config_dir.path())
        .current_dir(cwd.path());
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    punchclock()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("punchclock"));
}

#[test]
fn test_version_displays() {
    punchclock()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("punchclock"));
}

#[test]
fn test_help_lists_subcommands() {
    punchclock()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("enter"))
        .stdout(predicate::str::contains("leave"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("config"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument Parsing Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_enter_help_shows_date() {
    punchclock()
        .args(["enter", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--date"));
}

#[test]
fn test_serve_help_shows_bind() {
    punchclock()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--bind"));
}

#[test]
fn test_invalid_date_rejected() {
    punchclock()
        .args(["leave", "--date", "2026-13-40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--date"));
}

#[test]
fn test_unknown_subcommand_rejected() {
    punchclock().arg("lunch").assert().failure();
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_json_masks_password() {
    let config_dir = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(
        config_dir.path().join("config.toml"),
        r#"
[dooray]
subdomain = "acme"
username = "alice"
password = "hunter2"
"#,
    )
    .unwrap();

    let output = isolated(&config_dir, &cwd)
        .args(["--json", "config"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["settings"]["subdomain"], "acme");
    assert_eq!(json["settings"]["password"], "********");
    assert!(!String::from_utf8_lossy(&output).contains("hunter2"));
    assert!(
        json["warnings"][0]
            .as_str()
            .unwrap()
            .contains("plaintext password")
    );
}

#[test]
fn test_config_env_overrides_file() {
    let config_dir = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();
    fs::write(
        cwd.path().join("punchclock.toml"),
        "[dooray]\nsubdomain = \"acme\"\n",
    )
    .unwrap();

    isolated(&config_dir, &cwd)
        .env("DOORAY_SUBDOMAIN", "other")
        .args(["--json", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"subdomain\": \"other\""))
        .stdout(predicate::str::contains("DOORAY_SUBDOMAIN"));
}

#[test]
fn test_config_check_fails_on_missing_settings() {
    let config_dir = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    isolated(&config_dir, &cwd)
        .args(["config", "--check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DOORAY_LOGIN_PASSWORD"));
}

#[test]
fn test_enter_fails_fast_without_settings() {
    let config_dir = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    isolated(&config_dir, &cwd)
        .arg("enter")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing required settings"))
        .stderr(predicate::str::contains("DOORAY_SUBDOMAIN"));
}

#[test]
fn test_serve_rejects_bad_bind_address() {
    let config_dir = TempDir::new().unwrap();
    let cwd = TempDir::new().unwrap();

    isolated(&config_dir, &cwd)
        .env("DOORAY_SUBDOMAIN", "acme")
        .env("DOORAY_LOGIN_USERNAME", "alice")
        .env("DOORAY_LOGIN_PASSWORD", "secret")
        .args(["serve", "--bind", "not-an-address"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("server.bind"));
}
