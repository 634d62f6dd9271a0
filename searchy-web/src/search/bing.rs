//! Bing result page rules

use super::{has_http_scheme, ResultExtractor};
use searchy_common::SearchEngine;

const SEARCH_URL: &str = "https://www.bing.com/search?q=";

#[derive(Debug, Clone, Copy, Default)]
pub struct BingExtractor;

impl ResultExtractor for BingExtractor {
    fn engine(&self) -> SearchEngine {
        SearchEngine::Bing
    }

    fn search_url(&self, query: &str) -> String {
        format!("{SEARCH_URL}{}", urlencoding::encode(query))
    }

    fn result_selector(&self) -> &'static str {
        "li.b_algo a[href]"
    }

    fn next_selector(&self) -> &'static str {
        "a.sb_pagN"
    }

    fn accepts(&self, href: &str) -> bool {
        has_http_scheme(href)
    }
}
