//! # Searchy Common
//!
//! Foundational types shared by the Searchy crates: error severity
//! classification, log formatting helpers, and the search engine enum that
//! both configuration and retrieval speak.

pub mod error;
pub mod logging;
pub mod types;

pub use error::{ErrorSeverity, Severity};
pub use logging::Pretty;
pub use types::{ParseEngineError, SearchEngine};
