//! Google result page rules

use super::{has_http_scheme, ResultExtractor};
use searchy_common::SearchEngine;

const SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Organic results under `#search`, skipping Google's own links
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleExtractor;

impl ResultExtractor for GoogleExtractor {
    fn engine(&self) -> SearchEngine {
        SearchEngine::Google
    }

    fn search_url(&self, query: &str) -> String {
        format!("{SEARCH_URL}{}", urlencoding::encode(query))
    }

    fn result_selector(&self) -> &'static str {
        "div#search a[href]"
    }

    fn next_selector(&self) -> &'static str {
        "a#pnnext"
    }

    fn accepts(&self, href: &str) -> bool {
        has_http_scheme(href) && !href.contains("google")
    }
}
