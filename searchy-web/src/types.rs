//! Core types for search and page retrieval
//!
//! Requests are validated when they are built, so the retrieval pipeline
//! never sees an empty query, a zero result bound or a non-HTTP target.

use crate::search::extractor_for;
use searchy_common::{ErrorSeverity, SearchEngine, Severity};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Targets
// ============================================================================

/// Whether `candidate` is an absolute HTTP(S) URL with a host
pub fn is_http_url(candidate: &str) -> bool {
    let lower = candidate.trim_start().to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return false;
    }
    match url::Url::parse(candidate.trim()) {
        Ok(parsed) => parsed.host_str().is_some_and(|host| !host.is_empty()),
        Err(_) => false,
    }
}

/// Check every target, returning all invalid entries in input order
pub fn validate_targets(targets: &[String]) -> Result<(), Vec<String>> {
    let invalid: Vec<String> = targets
        .iter()
        .filter(|target| !is_http_url(target))
        .cloned()
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(invalid)
    }
}

// ============================================================================
// Search Requests
// ============================================================================

/// Problems found while building a [`SearchRequest`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("No search terms provided.")]
    EmptyQuery,

    #[error("Maximum results must be at least 1.")]
    ZeroResults,
}

impl Severity for RequestError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

/// Output options shared by search-with-fetch and get mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Convert fetched markup to plain text
    pub strip_html: bool,
    /// Write each fetched page into this folder
    pub save_folder: Option<PathBuf>,
}

/// A validated search; immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    engine: SearchEngine,
    query: String,
    max_results: usize,
    fetch_content: bool,
    options: FetchOptions,
}

impl SearchRequest {
    /// Start building a request for `query` on `engine`
    pub fn builder(engine: SearchEngine, query: impl Into<String>) -> SearchRequestBuilder {
        SearchRequestBuilder {
            engine,
            query: query.into(),
            max_results: searchy_config::types::DEFAULT_MAX_RESULTS,
            fetch_content: false,
            options: FetchOptions {
                strip_html: true,
                save_folder: None,
            },
        }
    }

    pub fn engine(&self) -> SearchEngine {
        self.engine
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    pub fn fetch_content(&self) -> bool {
        self.fetch_content
    }

    pub fn options(&self) -> &FetchOptions {
        &self.options
    }

    /// Results page URL for this query on the chosen engine
    pub fn search_url(&self) -> String {
        extractor_for(self.engine).search_url(&self.query)
    }
}

/// Builder for [`SearchRequest`]
#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    engine: SearchEngine,
    query: String,
    max_results: usize,
    fetch_content: bool,
    options: FetchOptions,
}

impl SearchRequestBuilder {
    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Fetch every result page instead of only listing URLs
    pub fn fetch_content(mut self, fetch: bool) -> Self {
        self.fetch_content = fetch;
        self
    }

    /// Strip markup from fetched pages (on by default for searches)
    pub fn strip_html(mut self, strip: bool) -> Self {
        self.options.strip_html = strip;
        self
    }

    pub fn save_folder(mut self, folder: Option<PathBuf>) -> Self {
        self.options.save_folder = folder;
        self
    }

    pub fn build(self) -> Result<SearchRequest, RequestError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(RequestError::EmptyQuery);
        }
        if self.max_results == 0 {
            return Err(RequestError::ZeroResults);
        }
        Ok(SearchRequest {
            engine: self.engine,
            query: query.to_string(),
            max_results: self.max_results,
            fetch_content: self.fetch_content,
            options: self.options,
        })
    }
}

// ============================================================================
// Fetch Outcomes
// ============================================================================

/// Content retrieved for one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedPage {
    /// Markup as the browser returned it
    pub raw: String,
    /// Plain text, when stripping was requested
    pub normalized: Option<String>,
    /// Where the content was written, when saving was requested
    pub saved_path: Option<PathBuf>,
}

impl FetchedPage {
    /// The text that gets printed and saved
    pub fn text(&self) -> &str {
        self.normalized.as_deref().unwrap_or(&self.raw)
    }
}

/// Result of fetching one target; failures are carried as text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchOutcome {
    pub url: String,
    pub result: Result<FetchedPage, String>,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Page text on success, the error description otherwise
    pub fn display_text(&self) -> &str {
        match &self.result {
            Ok(page) => page.text(),
            Err(message) => message,
        }
    }
}
