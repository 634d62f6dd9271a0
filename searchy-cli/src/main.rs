//! Searchy CLI entry point.
//!
//! Results and page content go to stdout; logs and errors go to stderr.
//!
//! Exit codes:
//! - 0: Success, including per-page fetch errors and searches without results
//! - 1: Bad input, configuration, browser launch failure or run timeout

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use searchy::{expand_targets, Cli, Commands};
use searchy_config::ConfigProvider;
use searchy_web::{ChromiumLauncher, FetchOptions, Orchestrator, RunSummary, SearchRequest};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // help and version are not failures
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = cli.log_level();
        EnvFilter::new(format!(
            "warn,searchy={level},searchy_web={level},searchy_config={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(io::stderr)
        .init();

    let exit_code = result_to_exit(run(cli).await);
    std::process::exit(exit_code);
}

/// Convert the run result to an exit code, reporting failures on stderr.
fn result_to_exit(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{e:#}");
            1
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut provider = ConfigProvider::new();
    if let Some(path) = &cli.config {
        provider = provider.with_file(path);
    }
    let mut settings = provider.load().context("Failed to load configuration")?;
    cli.apply_overrides(&mut settings);

    let summary = match &cli.command {
        Commands::Search(args) => {
            let request = SearchRequest::builder(
                args.engine().unwrap_or(settings.search.engine),
                args.query(),
            )
            .max_results(args.max.unwrap_or(settings.search.max_results))
            .fetch_content(args.get)
            .strip_html(!args.raw)
            .save_folder(args.save.clone())
            .build()?;

            let launcher = ChromiumLauncher::new(settings.browser.clone());
            Orchestrator::new(launcher, &settings)
                .search(&request, &mut io::stdout())
                .await?
        }
        Commands::Get(args) => {
            let urls = expand_targets(&args.urls, io::stdin().lock())?;
            let options = FetchOptions {
                strip_html: args.strip,
                save_folder: args.save.clone(),
            };

            let launcher = ChromiumLauncher::new(settings.browser.clone());
            Orchestrator::new(launcher, &settings)
                .get(&urls, &options, &mut io::stdout())
                .await?
        }
    };

    report(&summary);
    Ok(())
}

fn report(summary: &RunSummary) {
    if summary.failed > 0 {
        tracing::warn!(
            "{} of {} pages could not be fetched",
            summary.failed,
            summary.targets
        );
    }
    tracing::info!(
        "Done: {} targets, {} succeeded, {} saved",
        summary.targets,
        summary.succeeded,
        summary.saved_paths.len()
    );
}
