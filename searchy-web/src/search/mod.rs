//! Paginated result extraction
//!
//! Each engine is a [`ResultExtractor`] strategy that knows its query URL,
//! which anchors count as results and where the "next page" control lives.
//! [`extract_results`] drives any of them against a [`BrowserSession`] that has
//! already been navigated to the first results page.

mod bing;
mod google;

pub use bing::BingExtractor;
pub use google::GoogleExtractor;

use crate::browser::BrowserSession;
use searchy_common::SearchEngine;
use std::collections::HashSet;

/// Engine-specific scraping rules
pub trait ResultExtractor: Send + Sync {
    /// Engine these rules apply to
    fn engine(&self) -> SearchEngine;

    /// Results page URL for `query`
    fn search_url(&self, query: &str) -> String;

    /// CSS selector for candidate result anchors
    fn result_selector(&self) -> &'static str;

    /// CSS selector for the control that loads the next results page
    fn next_selector(&self) -> &'static str;

    /// Whether an anchor's `href` is a result
    fn accepts(&self, href: &str) -> bool;
}

static GOOGLE: GoogleExtractor = GoogleExtractor;
static BING: BingExtractor = BingExtractor;

/// Scraping rules for `engine`
pub fn extractor_for(engine: SearchEngine) -> &'static dyn ResultExtractor {
    match engine {
        SearchEngine::Google => &GOOGLE,
        SearchEngine::Bing => &BING,
    }
}

/// Whether `href` starts with an HTTP(S) scheme
pub(crate) fn has_http_scheme(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Collect up to `max_results` unique result URLs in discovery order.
///
/// Pages through the engine's "next" control until enough results are
/// collected or no next page exists. Never fails: any browser error ends the
/// scan and whatever was collected so far is returned.
pub async fn extract_results<S: BrowserSession>(
    session: &mut S,
    extractor: &dyn ResultExtractor,
    max_results: usize,
) -> Vec<String> {
    let mut results = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1usize;

    while results.len() < max_results {
        let anchors = match session.query_all(extractor.result_selector()).await {
            Ok(anchors) => anchors,
            Err(e) => {
                tracing::warn!("{} result scan failed on page {}: {}", extractor.engine(), page, e);
                break;
            }
        };

        let before = results.len();
        for anchor in &anchors {
            let href = match session.attribute(anchor, "href").await {
                Ok(Some(href)) => href,
                Ok(None) => continue,
                Err(e) => {
                    tracing::debug!("Skipping anchor without readable href: {}", e);
                    continue;
                }
            };
            if extractor.accepts(&href) && seen.insert(href.clone()) {
                results.push(href);
                if results.len() >= max_results {
                    break;
                }
            }
        }
        tracing::debug!(
            "{} page {}: {} anchors, {} new results, {} total",
            extractor.engine(),
            page,
            anchors.len(),
            results.len() - before,
            results.len()
        );

        if results.len() >= max_results {
            break;
        }

        let next = match session.query_all(extractor.next_selector()).await {
            Ok(mut controls) if !controls.is_empty() => controls.swap_remove(0),
            Ok(_) => {
                tracing::debug!("No next page control after page {}", page);
                break;
            }
            Err(e) => {
                tracing::debug!("Next page lookup failed: {}", e);
                break;
            }
        };
        if let Err(e) = session.click(&next).await {
            tracing::warn!("Could not open results page {}: {}", page + 1, e);
            break;
        }
        if let Err(e) = session.wait_for_network_idle().await {
            tracing::warn!("Results page {} did not settle: {}", page + 1, e);
            break;
        }
        page += 1;
    }

    results.truncate(max_results);
    results
}
