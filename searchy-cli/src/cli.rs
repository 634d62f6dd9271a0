//! CLI definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use searchy_config::SearchySettings;
use searchy_web::SearchEngine;

/// Searchy - web search and page retrieval through a headless browser
#[derive(Parser, Debug)]
#[command(name = "searchy")]
#[command(version)]
#[command(about = "Web search and page content retrieval through headless Chrome")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Log progress to stderr
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with_all = ["debug", "verbose"])]
    pub quiet: bool,

    /// Extra configuration file, applied over the discovered ones
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Give up on the whole run after this many seconds
    #[arg(long, global = true, value_name = "SECONDS",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Stop waiting out rate limits on a page after N waits
    #[arg(long, global = true, value_name = "N")]
    pub max_rate_limit_retries: Option<u32>,

    /// Show the browser window
    #[arg(long, global = true)]
    pub headful: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search with Google or Bing and list (or download) the results
    Search(SearchArgs),
    /// Download content from URL(s)
    Get(GetArgs),
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search terms, joined with spaces
    #[arg(value_name = "TERMS")]
    pub terms: Vec<String>,

    /// Use Bing
    #[arg(long, conflicts_with = "google")]
    pub bing: bool,

    /// Use Google (default)
    #[arg(long)]
    pub google: bool,

    /// Download content from the search results
    #[arg(long)]
    pub get: bool,

    /// Maximum number of search results (default: 10)
    #[arg(long, value_name = "N")]
    pub max: Option<usize>,

    /// Strip HTML tags from downloaded content (default)
    #[arg(long)]
    pub strip: bool,

    /// Keep downloaded content as HTML
    #[arg(long, conflicts_with = "strip")]
    pub raw: bool,

    /// Save each downloaded page into DIR
    #[arg(long, value_name = "DIR")]
    pub save: Option<PathBuf>,
}

impl SearchArgs {
    /// Engine picked on the command line, if any
    pub fn engine(&self) -> Option<SearchEngine> {
        if self.bing {
            Some(SearchEngine::Bing)
        } else if self.google {
            Some(SearchEngine::Google)
        } else {
            None
        }
    }

    pub fn query(&self) -> String {
        self.terms.join(" ")
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// URLs to download; `-` reads them from stdin, `@FILE` from a file
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Strip HTML tags from downloaded content
    #[arg(long)]
    pub strip: bool,

    /// Save each downloaded page into DIR
    #[arg(long, value_name = "DIR")]
    pub save: Option<PathBuf>,
}

impl Cli {
    /// Log level chosen by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Apply command-line flags on top of loaded settings
    pub fn apply_overrides(&self, settings: &mut SearchySettings) {
        if let Some(timeout) = self.timeout {
            settings.run_timeout_secs = Some(timeout);
        }
        if let Some(cap) = self.max_rate_limit_retries {
            settings.fetch.max_rate_limit_retries = Some(cap);
        }
        if self.headful {
            settings.browser.headful = true;
        }
    }
}
