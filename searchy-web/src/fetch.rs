//! Fetching one page through a browser session
//!
//! A fetch navigates, reads the page (retrying while the page is still
//! navigating), waits out rate-limit notices, then optionally strips markup
//! and saves the result. Failures never escape as errors: they become the
//! outcome's error text so a batch keeps going.

use crate::browser::{BrowserError, BrowserSession};
use crate::filename::FilenameAllocator;
use crate::normalize::normalize_html;
use crate::types::{FetchOptions, FetchOutcome, FetchedPage};
use searchy_common::{ErrorSeverity, Severity};
use searchy_config::FetchSettings;
use std::error::Error as _;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Text a site shows when it throttles us
const RATE_LIMIT_NOTICE: &str = "Rate limit is exceeded. Try again in ";
const RATE_LIMIT_UNITS: &str = " seconds.";

/// Errors that end a single fetch
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// The rate-limit notice did not say how long to wait
    #[error("unreadable rate limit notice: {0}")]
    RateLimitNotice(String),

    #[error("still rate limited after {retries} waits")]
    RateLimitExhausted { retries: u32 },

    #[error("failed to save content to {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Severity for FetchError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            FetchError::Browser(e) => e.severity(),
            FetchError::RateLimitNotice(_)
            | FetchError::RateLimitExhausted { .. }
            | FetchError::Persist { .. } => ErrorSeverity::Error,
        }
    }
}

/// Per-target error text: the message plus one line per underlying cause
pub fn describe_failure(url: &str, error: &FetchError) -> String {
    let mut text = format!("Error fetching content from {url}: {error}");
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    text
}

/// Wait requested by a rate-limit notice in `content`.
///
/// `None` when there is no notice, `Some(Err(_))` when the notice is there but
/// the number of seconds cannot be read.
pub fn rate_limit_wait(content: &str) -> Option<Result<Duration, FetchError>> {
    let start = content.find(RATE_LIMIT_NOTICE)? + RATE_LIMIT_NOTICE.len();
    let rest = &content[start..];
    let parsed = rest
        .find(RATE_LIMIT_UNITS)
        .and_then(|end| rest[..end].trim().parse::<u64>().ok());
    Some(match parsed {
        Some(seconds) => Ok(Duration::from_secs(seconds)),
        None => {
            let snippet: String = rest.chars().take(40).collect();
            Err(FetchError::RateLimitNotice(format!(
                "{}{}",
                RATE_LIMIT_NOTICE,
                snippet.trim_end()
            )))
        }
    })
}

/// Fetches pages one at a time through a borrowed session
#[derive(Debug, Clone, Default)]
pub struct ContentFetcher {
    settings: FetchSettings,
}

impl ContentFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    /// Fetch `url`, folding any failure into the outcome
    pub async fn fetch<S: BrowserSession>(
        &self,
        session: &mut S,
        url: &str,
        options: &FetchOptions,
    ) -> FetchOutcome {
        let result = match self.try_fetch(session, url, options).await {
            Ok(page) => Ok(page),
            Err(error) => {
                match error.severity() {
                    ErrorSeverity::Warning => tracing::warn!("Fetch of {} failed: {}", url, error),
                    _ => tracing::error!("Fetch of {} failed: {}", url, error),
                }
                Err(describe_failure(url, &error))
            }
        };
        FetchOutcome {
            url: url.to_string(),
            result,
        }
    }

    async fn try_fetch<S: BrowserSession>(
        &self,
        session: &mut S,
        url: &str,
        options: &FetchOptions,
    ) -> Result<FetchedPage, FetchError> {
        let mut rate_limit_waits = 0u32;
        let raw = loop {
            session.navigate(url).await?;
            let content = self.read_content(session).await?;

            let wait = match rate_limit_wait(&content) {
                None => break content,
                Some(wait) => wait?,
            };
            if let Some(cap) = self.settings.max_rate_limit_retries {
                if rate_limit_waits >= cap {
                    return Err(FetchError::RateLimitExhausted { retries: cap });
                }
            }
            rate_limit_waits += 1;
            tracing::warn!(
                "Rate limited by {}, waiting {}s before retrying",
                url,
                wait.as_secs()
            );
            tokio::time::sleep(wait).await;
        };
        tracing::debug!("Fetched {} characters from {}", raw.len(), url);

        let normalized = options.strip_html.then(|| normalize_html(&raw));

        let saved_path = match &options.save_folder {
            Some(folder) => {
                let text = normalized.as_deref().unwrap_or(&raw);
                Some(save(folder, url, text).await?)
            }
            None => None,
        };

        Ok(FetchedPage {
            raw,
            normalized,
            saved_path,
        })
    }

    /// Read page content, retrying while the page reports it is navigating
    async fn read_content<S: BrowserSession>(&self, session: &mut S) -> Result<String, FetchError> {
        let mut retries = 0u32;
        loop {
            match session.content().await {
                Ok(content) => return Ok(content),
                Err(e) if e.is_transient() && retries < self.settings.max_retries => {
                    retries += 1;
                    tracing::debug!(
                        "Content not ready ({}), retry {}/{}",
                        e,
                        retries,
                        self.settings.max_retries
                    );
                    tokio::time::sleep(self.settings.retry_delay()).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

async fn save(folder: &std::path::Path, url: &str, text: &str) -> Result<PathBuf, FetchError> {
    let path = FilenameAllocator::new(folder)
        .propose(url)
        .map_err(|source| FetchError::Persist {
            path: folder.to_path_buf(),
            source,
        })?;
    tokio::fs::write(&path, text.as_bytes())
        .await
        .map_err(|source| FetchError::Persist {
            path: path.clone(),
            source,
        })?;
    tracing::info!("Saved {} to {}", url, path.display());
    Ok(path)
}
