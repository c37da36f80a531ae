//! Browser executable discovery.

use std::path::{Path, PathBuf};

/// Find an installed Chromium-family browser.
///
/// Absolute candidates must exist on disk; bare names are looked up on
/// `$PATH`.
pub fn find_chrome_executable() -> Option<PathBuf> {
    browser_candidates()
        .into_iter()
        .find_map(|candidate| resolve_candidate(&candidate))
}

fn resolve_candidate(candidate: &str) -> Option<PathBuf> {
    if is_path_like(candidate) {
        let path = Path::new(candidate);
        path.exists().then(|| path.to_path_buf())
    } else {
        which::which(candidate).ok()
    }
}

fn is_path_like(candidate: &str) -> bool {
    candidate.starts_with('/') || candidate.contains('\\') || candidate.contains(':')
}

pub(crate) fn browser_candidates() -> Vec<String> {
    if cfg!(target_os = "macos") {
        [
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
            "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    } else if cfg!(target_os = "windows") {
        windows_browser_candidates()
    } else {
        [
            "chromium",
            "chromium-browser",
            "google-chrome-stable",
            "google-chrome",
            "headless-shell",
            "brave-browser",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/google-chrome",
            "/snap/bin/chromium",
        ]
        .into_iter()
        .map(str::to_string)
        .collect()
    }
}

pub(crate) fn windows_browser_candidates() -> Vec<String> {
    let mut roots: Vec<PathBuf> = ["PROGRAMFILES", "PROGRAMFILES(X86)", "LOCALAPPDATA"]
        .into_iter()
        .filter_map(|key| std::env::var(key).ok())
        .map(PathBuf::from)
        .collect();
    if roots.is_empty() {
        roots.push(PathBuf::from(r"C:\Program Files"));
        roots.push(PathBuf::from(r"C:\Program Files (x86)"));
    }

    let suffixes: &[&[&str]] = &[
        &["Google", "Chrome", "Application", "chrome.exe"],
        &["Microsoft", "Edge", "Application", "msedge.exe"],
        &["Chromium", "Application", "chrome.exe"],
    ];

    let mut candidates: Vec<String> = roots
        .iter()
        .flat_map(|root| {
            suffixes.iter().map(move |suffix| {
                let mut path = root.clone();
                path.extend(suffix.iter());
                path.to_string_lossy().to_string()
            })
        })
        .collect();

    candidates.extend(["chrome.exe", "msedge.exe", "chromium.exe"].map(str::to_string));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_candidates_include_common_commands() {
        let candidates = windows_browser_candidates();
        assert!(candidates.contains(&"chrome.exe".to_string()));
        assert!(candidates.contains(&"msedge.exe".to_string()));
    }

    #[test]
    fn test_path_like_detection() {
        assert!(is_path_like("/usr/bin/chromium"));
        assert!(is_path_like(r"C:\Program Files\chrome.exe"));
        assert!(!is_path_like("chromium"));
    }

    #[test]
    fn test_missing_absolute_candidate_is_skipped() {
        assert!(resolve_candidate("/definitely/not/a/browser").is_none());
    }
}
