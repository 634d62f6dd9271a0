//! Settings types

use crate::error::{ConfigError, ConfigResult};
use searchy_common::SearchEngine;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default number of search results to collect
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Default number of content retries after a navigation-in-progress failure
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default wait between content retries
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Top-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchySettings {
    /// Browser launch settings
    pub browser: BrowserSettings,
    /// Content fetcher settings
    pub fetch: FetchSettings,
    /// Search defaults
    pub search: SearchSettings,
    /// Upper bound on a whole run, in seconds (none = run to completion)
    pub run_timeout_secs: Option<u64>,
}

impl SearchySettings {
    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.search.max_results == 0 {
            return Err(ConfigError::invalid(
                "search.max_results",
                "must be at least 1",
            ));
        }
        if self.browser.window_width == 0 || self.browser.window_height == 0 {
            return Err(ConfigError::invalid(
                "browser.window_width/window_height",
                "window dimensions must be positive",
            ));
        }
        if self.run_timeout_secs == Some(0) {
            return Err(ConfigError::invalid(
                "run_timeout_secs",
                "must be positive when set",
            ));
        }
        Ok(())
    }

    /// Run timeout as a [`Duration`]
    pub fn run_timeout(&self) -> Option<Duration> {
        self.run_timeout_secs.map(Duration::from_secs)
    }
}

/// Browser launch settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Chrome executable; auto-detected when unset
    pub chrome_path: Option<PathBuf>,
    /// Show the browser window instead of running headless
    pub headful: bool,
    /// Viewport width in pixels
    pub window_width: u32,
    /// Viewport height in pixels
    pub window_height: u32,
    /// Longest wait for the network to go quiet after a click, in milliseconds
    pub network_idle_timeout_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            chrome_path: None,
            headful: false,
            window_width: 1366,
            window_height: 768,
            network_idle_timeout_ms: 10_000,
        }
    }
}

/// Content fetcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// Content retries after a navigation-in-progress failure
    pub max_retries: u32,
    /// Wait between content retries, in milliseconds
    pub retry_delay_ms: u64,
    /// Cap on rate-limit waits per URL; unset means wait as long as the site asks
    pub max_rate_limit_retries: Option<u32>,
}

impl FetchSettings {
    /// Retry delay as a [`Duration`]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_rate_limit_retries: None,
        }
    }
}

/// Search defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Engine used when the command line does not pick one
    pub engine: SearchEngine,
    /// Result count used when the command line does not give one
    pub max_results: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            engine: SearchEngine::Google,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = SearchySettings::default();
        assert_eq!(settings.search.engine, SearchEngine::Google);
        assert_eq!(settings.search.max_results, 10);
        assert_eq!(settings.fetch.max_retries, 3);
        assert_eq!(settings.fetch.retry_delay(), Duration::from_secs(1));
        assert!(settings.fetch.max_rate_limit_retries.is_none());
        assert!(settings.run_timeout().is_none());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_results() {
        let mut settings = SearchySettings::default();
        settings.search.max_results = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("search.max_results"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let settings = SearchySettings {
            run_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
