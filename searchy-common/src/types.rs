//! Core type definitions shared between configuration and retrieval

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Search provider whose result pages can be scraped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    /// Google web search
    #[default]
    Google,
    /// Microsoft Bing web search
    Bing,
}

impl SearchEngine {
    /// Lowercase engine name, as used in config files and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Bing => "bing",
        }
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when an engine name is not recognized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEngineError(pub String);

impl fmt::Display for ParseEngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search engine '{}' (expected google or bing)", self.0)
    }
}

impl std::error::Error for ParseEngineError {}

impl FromStr for SearchEngine {
    type Err = ParseEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(SearchEngine::Google),
            "bing" => Ok(SearchEngine::Bing),
            other => Err(ParseEngineError(other.to_string())),
        }
    }
}
