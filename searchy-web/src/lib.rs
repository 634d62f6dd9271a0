//! Searchy Web
//!
//! Retrieval pipeline for search-engine results and page content through a
//! headless browser: paginated result extraction per engine, content fetching
//! with transient-failure retry and rate-limit backoff, HTML-to-text
//! normalization, and collision-safe persistence.
//!
//! The browser itself sits behind the [`BrowserSession`] trait; the Chrome
//! backend in [`browser::chromium`] drives a real browser over CDP.

pub mod browser;
pub mod chrome;
pub mod fetch;
pub mod filename;
pub mod normalize;
pub mod retrieval;
pub mod search;
pub mod types;

// Re-export key types
pub use browser::chromium::{ChromiumLauncher, ChromiumSession};
pub use browser::{BrowserError, BrowserSession, SessionLauncher};
pub use chrome::{detect_chrome, ChromeDetectionResult};
pub use fetch::{describe_failure, rate_limit_wait, ContentFetcher, FetchError};
pub use filename::FilenameAllocator;
pub use normalize::normalize_html;
pub use retrieval::{Orchestrator, RetrievalError, RunSummary, NO_RESULTS, SEPARATOR};
pub use search::{
    extract_results, extractor_for, BingExtractor, GoogleExtractor, ResultExtractor,
};
pub use types::{
    is_http_url, validate_targets, FetchOptions, FetchOutcome, FetchedPage, RequestError,
    SearchRequest, SearchRequestBuilder,
};

pub use searchy_common::SearchEngine;
