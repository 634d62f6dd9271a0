//! Chrome executable discovery
//!
//! Looks for a Chrome/Chromium binary in this order: the configured path,
//! the `SEARCHY_CHROME` and `CHROME` environment variables, well-known binary
//! names on `PATH`, then the platform's standard install locations. A failed
//! lookup keeps every candidate it tried so the error can list them.

use std::path::{Path, PathBuf};

/// Environment variables consulted, in order
const ENV_VARS: &[&str] = &["SEARCHY_CHROME", "CHROME"];

const BINARY_NAMES: &[&str] = &[
    "chrome",
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
];

/// Outcome of a Chrome lookup
#[derive(Debug, Clone)]
pub struct ChromeDetectionResult {
    /// Executable found, if any
    pub path: Option<PathBuf>,
    /// Where the executable was found (config, env var, PATH, standard location)
    pub source: Option<String>,
    /// Every candidate checked, in order
    pub candidates: Vec<PathBuf>,
}

impl ChromeDetectionResult {
    fn found(path: PathBuf, source: impl Into<String>, candidates: Vec<PathBuf>) -> Self {
        Self {
            path: Some(path),
            source: Some(source.into()),
            candidates,
        }
    }

    /// Human-readable explanation of a failed lookup, with install hints
    pub fn failure_message(&self) -> String {
        let checked = self
            .candidates
            .iter()
            .map(|p| format!("  - {}", p.display()))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Chrome/Chromium not found. Checked {} locations:\n{}\n\n{}",
            self.candidates.len(),
            checked,
            installation_instructions()
        )
    }
}

/// Find a Chrome executable, preferring `configured` when it exists
pub fn detect_chrome(configured: Option<&Path>) -> ChromeDetectionResult {
    let mut candidates = Vec::new();

    if let Some(path) = configured {
        candidates.push(path.to_path_buf());
        if path.is_file() {
            return ChromeDetectionResult::found(path.to_path_buf(), "configuration", candidates);
        }
    }

    for var in ENV_VARS {
        if let Ok(value) = std::env::var(var) {
            let path = PathBuf::from(value);
            candidates.push(path.clone());
            if path.is_file() {
                return ChromeDetectionResult::found(
                    path,
                    format!("environment variable {var}"),
                    candidates,
                );
            }
        }
    }

    for name in BINARY_NAMES {
        if let Ok(path) = which::which(name) {
            candidates.push(path.clone());
            return ChromeDetectionResult::found(path, format!("PATH ({name})"), candidates);
        }
    }

    for path in standard_locations() {
        candidates.push(path.clone());
        if path.is_file() {
            return ChromeDetectionResult::found(path, "standard installation location", candidates);
        }
    }

    ChromeDetectionResult {
        path: None,
        source: None,
        candidates,
    }
}

fn installation_instructions() -> &'static str {
    #[cfg(target_os = "macos")]
    return "Install Chrome via:\n  - Download from https://www.google.com/chrome/\n  - Or use Homebrew: brew install --cask google-chrome";

    #[cfg(target_os = "linux")]
    return "Install Chrome via:\n  - apt install google-chrome-stable (Debian/Ubuntu)\n  - dnf install chromium (Fedora)\n  - Or point SEARCHY_CHROME at an existing binary";

    #[cfg(target_os = "windows")]
    return "Install Chrome via:\n  - Download from https://www.google.com/chrome/\n  - Or use winget: winget install Google.Chrome";

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return "Install Chrome or Chromium and set SEARCHY_CHROME to its path";
}

fn standard_locations() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        vec![
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
            PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
        ]
    }

    #[cfg(target_os = "linux")]
    {
        vec![
            PathBuf::from("/usr/bin/google-chrome"),
            PathBuf::from("/usr/bin/chromium"),
            PathBuf::from("/usr/bin/chromium-browser"),
            PathBuf::from("/snap/bin/chromium"),
            PathBuf::from("/opt/google/chrome/chrome"),
        ]
    }

    #[cfg(target_os = "windows")]
    {
        let program_files =
            std::env::var("ProgramFiles").unwrap_or_else(|_| "C:\\Program Files".to_string());
        let program_files_x86 = std::env::var("ProgramFiles(x86)")
            .unwrap_or_else(|_| "C:\\Program Files (x86)".to_string());
        vec![
            PathBuf::from(format!("{program_files}\\Google\\Chrome\\Application\\chrome.exe")),
            PathBuf::from(format!("{program_files_x86}\\Google\\Chrome\\Application\\chrome.exe")),
        ]
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::NamedTempFile;

    #[test]
    fn test_configured_path_wins() {
        let fake = NamedTempFile::new().unwrap();
        let result = detect_chrome(Some(fake.path()));
        assert_eq!(result.path.as_deref(), Some(fake.path()));
        assert_eq!(result.source.as_deref(), Some("configuration"));
        assert_eq!(result.candidates.len(), 1);
    }

    #[test]
    #[serial]
    fn test_env_var_is_consulted() {
        let fake = NamedTempFile::new().unwrap();
        std::env::set_var("SEARCHY_CHROME", fake.path());
        let result = detect_chrome(None);
        std::env::remove_var("SEARCHY_CHROME");

        assert_eq!(result.path.as_deref(), Some(fake.path()));
        assert_eq!(
            result.source.as_deref(),
            Some("environment variable SEARCHY_CHROME")
        );
    }

    #[test]
    #[serial]
    fn test_missing_configured_path_is_recorded() {
        let missing = PathBuf::from("/definitely/not/here/chrome");
        let result = detect_chrome(Some(&missing));
        assert_eq!(result.candidates.first(), Some(&missing));
        if let Some(found) = result.path {
            assert_ne!(found, missing);
        }
    }

    #[test]
    fn test_failure_message_lists_candidates() {
        let result = ChromeDetectionResult {
            path: None,
            source: None,
            candidates: vec![PathBuf::from("/a/chrome"), PathBuf::from("/b/chrome")],
        };
        let message = result.failure_message();
        assert!(message.contains("Checked 2 locations"));
        assert!(message.contains("/a/chrome"));
        assert!(message.contains("Install") || message.contains("SEARCHY_CHROME"));
    }
}
