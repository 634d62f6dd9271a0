//! Error severity classification shared across Searchy crates
//!
//! Every component error type implements [`Severity`] so callers can pick a
//! log level and decide whether a failure ends the run or only one target.

/// Severity levels for error classification
///
/// # Severity Levels
///
/// - **Warning**: Something unusual happened but the result is still usable,
///   e.g. a search that produced no results.
/// - **Error**: One operation failed but the run continues, e.g. a single URL
///   that could not be fetched.
/// - **Critical**: The run cannot continue, e.g. the browser could not be
///   launched.
///
/// # Examples
///
/// ```rust
/// use searchy_common::ErrorSeverity;
///
/// let no_results = ErrorSeverity::Warning;
/// let bad_page = ErrorSeverity::Error;
/// let no_browser = ErrorSeverity::Critical;
/// assert_ne!(no_results, no_browser);
/// # let _ = bad_page;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,

    /// Operation failed but the run can continue with other targets
    Error,

    /// The run cannot continue
    Critical,
}

/// Trait for error types that have severity levels
///
/// # Example
///
/// ```rust
/// use searchy_common::{ErrorSeverity, Severity};
///
/// #[derive(Debug)]
/// enum MyError {
///     BrowserGone,
///     PageFailed,
///     Empty,
/// }
///
/// impl Severity for MyError {
///     fn severity(&self) -> ErrorSeverity {
///         match self {
///             MyError::BrowserGone => ErrorSeverity::Critical,
///             MyError::PageFailed => ErrorSeverity::Error,
///             MyError::Empty => ErrorSeverity::Warning,
///         }
///     }
/// }
///
/// assert_eq!(MyError::BrowserGone.severity(), ErrorSeverity::Critical);
/// ```
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;

    /// Whether this error should end the whole run
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}
