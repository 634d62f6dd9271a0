//! Browser session boundary
//!
//! The retrieval pipeline never talks to a browser directly. It drives a
//! [`BrowserSession`], one live page that can navigate, query the DOM, click,
//! wait for the network to settle and hand back its markup. Sessions come from
//! a [`SessionLauncher`] so the orchestrator can own the whole lifetime:
//! launch once per run, reuse for every target, close on every exit path.

pub mod chromium;

use async_trait::async_trait;
use searchy_common::{ErrorSeverity, Severity};

/// Substring a backend's failure text carries when content was requested
/// while the page was still navigating.
pub const NAVIGATION_IN_PROGRESS_MARKER: &str = "navigating";

/// Errors reported by a browser backend
#[derive(Debug, thiserror::Error)]
pub enum BrowserError {
    /// The page is mid-navigation; reading it again shortly usually succeeds
    #[error("page is navigating: {0}")]
    NavigationInProgress(String),

    /// Navigation to a URL failed (DNS, TLS, refused connection, ...)
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// The browser could not be found or started
    #[error("browser launch failed: {0}")]
    Launch(String),

    /// Any other protocol or page-level failure
    #[error("{0}")]
    Protocol(String),
}

impl BrowserError {
    /// Classify a backend failure description.
    ///
    /// Text containing [`NAVIGATION_IN_PROGRESS_MARKER`] becomes
    /// [`BrowserError::NavigationInProgress`]; everything else is a protocol error.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains(NAVIGATION_IN_PROGRESS_MARKER) {
            BrowserError::NavigationInProgress(message)
        } else {
            BrowserError::Protocol(message)
        }
    }

    /// Whether the failure is worth retrying without navigating again
    pub fn is_transient(&self) -> bool {
        matches!(self, BrowserError::NavigationInProgress(_))
    }
}

impl Severity for BrowserError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            BrowserError::Launch(_) => ErrorSeverity::Critical,
            BrowserError::NavigationInProgress(_) => ErrorSeverity::Warning,
            BrowserError::Navigation { .. } | BrowserError::Protocol(_) => ErrorSeverity::Error,
        }
    }
}

/// One live browser page.
///
/// Every method may suspend for arbitrary wall-clock time. Implementations
/// must not busy-wait.
#[async_trait]
pub trait BrowserSession: Send {
    /// Handle to a DOM element found by [`BrowserSession::query_all`]
    type Element: Send + Sync;

    /// Load `url` in the page
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// All elements matching a CSS selector, in document order
    async fn query_all(&mut self, selector: &str) -> Result<Vec<Self::Element>, BrowserError>;

    /// Attribute value of an element, `None` when absent
    async fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError>;

    /// Click an element
    async fn click(&mut self, element: &Self::Element) -> Result<(), BrowserError>;

    /// Suspend until network activity has settled
    async fn wait_for_network_idle(&mut self) -> Result<(), BrowserError>;

    /// Full markup of the current page
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// Release the page and whatever backs it
    async fn close(&mut self) -> Result<(), BrowserError> {
        Ok(())
    }
}

/// Creates sessions; one call per orchestrated run
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    /// Session type produced by this launcher
    type Session: BrowserSession;

    /// Start a browser and open a blank page
    async fn launch(&self) -> Result<Self::Session, BrowserError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_navigation_in_progress() {
        let err = BrowserError::classify("Unable to retrieve content because the page is navigating");
        assert!(err.is_transient());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_classify_other_failures() {
        let err = BrowserError::classify("Target closed");
        assert!(!err.is_transient());
        assert!(matches!(err, BrowserError::Protocol(_)));
    }

    #[test]
    fn test_launch_failure_is_critical() {
        assert!(BrowserError::Launch("no chrome".into()).is_critical());
        assert!(!BrowserError::Navigation {
            url: "https://example.com".into(),
            message: "net::ERR_NAME_NOT_RESOLVED".into()
        }
        .is_critical());
    }
}
