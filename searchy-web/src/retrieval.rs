//! Retrieval orchestration
//!
//! An [`Orchestrator`] turns a search request or an explicit URL list into
//! printed (and optionally saved) output. Each run launches exactly one
//! browser session, reuses it for every target and closes it on every exit
//! path, including errors and an expired run timeout.

use crate::browser::{BrowserError, BrowserSession, SessionLauncher};
use crate::fetch::ContentFetcher;
use crate::search::{extract_results, extractor_for};
use crate::types::{validate_targets, FetchOptions, FetchOutcome, SearchRequest};
use searchy_common::{ErrorSeverity, Pretty, Severity};
use searchy_config::SearchySettings;
use serde::Serialize;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Marker line around per-URL blocks when more than one page is printed
pub const SEPARATOR: &str = "---separator---";

/// Printed when a search yields nothing
pub const NO_RESULTS: &str = "No results found.";

/// Errors that end a whole run
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("{}", invalid_targets_message(.0))]
    InvalidTargets(Vec<String>),

    #[error("No URLs provided.")]
    NoTargets,

    #[error(transparent)]
    Launch(BrowserError),

    #[error("could not load search results from {url}: {source}")]
    SearchPage {
        url: String,
        #[source]
        source: BrowserError,
    },

    #[error("run timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

fn invalid_targets_message(targets: &[String]) -> String {
    match targets {
        [single] => format!("Invalid URL: {single}"),
        many => {
            let listed = many
                .iter()
                .map(|target| format!("  {target}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!("Invalid URLs:\n{listed}")
        }
    }
}

impl Severity for RetrievalError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RetrievalError::InvalidTargets(_) | RetrievalError::NoTargets => ErrorSeverity::Error,
            RetrievalError::SearchPage { .. } => ErrorSeverity::Error,
            RetrievalError::Launch(_)
            | RetrievalError::Timeout(_)
            | RetrievalError::Output(_) => ErrorSeverity::Critical,
        }
    }
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// URLs listed or fetched
    pub targets: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub saved_paths: Vec<PathBuf>,
}

impl RunSummary {
    fn record(&mut self, outcome: &FetchOutcome) {
        self.targets += 1;
        match &outcome.result {
            Ok(page) => {
                self.succeeded += 1;
                self.saved_paths.extend(page.saved_path.clone());
            }
            Err(_) => self.failed += 1,
        }
    }
}

/// Drives one browser session per run
#[derive(Debug)]
pub struct Orchestrator<L> {
    launcher: L,
    fetcher: ContentFetcher,
    run_timeout: Option<Duration>,
}

impl<L: SessionLauncher> Orchestrator<L> {
    pub fn new(launcher: L, settings: &SearchySettings) -> Self {
        Self {
            launcher,
            fetcher: ContentFetcher::new(settings.fetch.clone()),
            run_timeout: settings.run_timeout(),
        }
    }

    /// Run a search, printing result URLs or fetched pages to `out`
    pub async fn search<W: Write>(
        &self,
        request: &SearchRequest,
        out: &mut W,
    ) -> Result<RunSummary, RetrievalError> {
        tracing::info!(
            "Searching {} for {:?} (max {})",
            request.engine(),
            request.query(),
            request.max_results()
        );
        let mut session = self.acquire().await?;
        let result = self
            .bounded(self.search_with(&mut session, request, out))
            .await;
        release(&mut session).await;
        log_summary(&result);
        result
    }

    /// Fetch explicit URLs, printing each page to `out`.
    ///
    /// Every URL is checked before the browser starts; any invalid entry fails
    /// the run and lists all of them.
    pub async fn get<W: Write>(
        &self,
        urls: &[String],
        options: &FetchOptions,
        out: &mut W,
    ) -> Result<RunSummary, RetrievalError> {
        if urls.is_empty() {
            return Err(RetrievalError::NoTargets);
        }
        validate_targets(urls).map_err(RetrievalError::InvalidTargets)?;

        let mut session = self.acquire().await?;
        let result = self
            .bounded(self.fetch_all(&mut session, urls, options, out))
            .await;
        release(&mut session).await;
        log_summary(&result);
        result
    }

    async fn acquire(&self) -> Result<L::Session, RetrievalError> {
        tracing::debug!("Launching browser session");
        self.launcher.launch().await.map_err(RetrievalError::Launch)
    }

    async fn bounded<T>(
        &self,
        work: impl Future<Output = Result<T, RetrievalError>>,
    ) -> Result<T, RetrievalError> {
        match self.run_timeout {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .unwrap_or_else(|_| Err(RetrievalError::Timeout(limit))),
            None => work.await,
        }
    }

    async fn search_with<W: Write>(
        &self,
        session: &mut L::Session,
        request: &SearchRequest,
        out: &mut W,
    ) -> Result<RunSummary, RetrievalError> {
        let url = request.search_url();
        session
            .navigate(&url)
            .await
            .map_err(|source| RetrievalError::SearchPage {
                url: url.clone(),
                source,
            })?;

        let extractor = extractor_for(request.engine());
        let urls = extract_results(session, extractor, request.max_results()).await;

        if urls.is_empty() {
            writeln!(out, "{NO_RESULTS}")?;
            out.flush()?;
            return Ok(RunSummary::default());
        }

        if !request.fetch_content() {
            for url in &urls {
                writeln!(out, "{url}")?;
            }
            out.flush()?;
            return Ok(RunSummary {
                targets: urls.len(),
                succeeded: urls.len(),
                ..Default::default()
            });
        }

        self.fetch_all(session, &urls, request.options(), out).await
    }

    async fn fetch_all<W: Write>(
        &self,
        session: &mut L::Session,
        urls: &[String],
        options: &FetchOptions,
        out: &mut W,
    ) -> Result<RunSummary, RetrievalError> {
        let mut summary = RunSummary::default();
        let wrap = urls.len() > 1;

        for url in urls {
            let outcome = self.fetcher.fetch(session, url, options).await;
            if wrap {
                writeln!(out, "{SEPARATOR}")?;
                writeln!(out, "url: {url}")?;
                writeln!(out, "{SEPARATOR}")?;
            }
            writeln!(out, "{}", outcome.display_text())?;
            out.flush()?;
            summary.record(&outcome);
        }
        if wrap {
            writeln!(out, "{SEPARATOR}")?;
            out.flush()?;
        }
        Ok(summary)
    }
}

async fn release<S: BrowserSession>(session: &mut S) {
    if let Err(e) = session.close().await {
        tracing::debug!("Browser close error (ignored): {}", e);
    }
}

fn log_summary(result: &Result<RunSummary, RetrievalError>) {
    match result {
        Ok(summary) => tracing::debug!("Run finished: {}", Pretty(summary)),
        Err(e) if e.is_critical() => tracing::error!("Run failed: {}", e),
        Err(e) => tracing::warn!("Run failed: {}", e),
    }
}
