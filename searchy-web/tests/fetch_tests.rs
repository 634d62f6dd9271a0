mod common;

use common::{html, MockSession, Reply, Script};
use searchy_config::FetchSettings;
use searchy_web::{ContentFetcher, FetchOptions};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::Instant;

const URL: &str = "https://example.com/article";

fn plain() -> FetchOptions {
    FetchOptions::default()
}

#[tokio::test(start_paused = true)]
async fn test_navigation_in_progress_is_retried() {
    let script = Script::default().reply(
        URL,
        vec![Reply::Navigating, Reply::Navigating, html("<p>ready</p>")],
    );
    let (mut session, log) = MockSession::new(script);
    let fetcher = ContentFetcher::default();

    let start = Instant::now();
    let outcome = fetcher.fetch(&mut session, URL, &plain()).await;

    assert_eq!(outcome.display_text(), "<p>ready</p>");
    assert_eq!(start.elapsed(), Duration::from_secs(2));
    let log = log.lock().unwrap();
    assert_eq!(log.content_calls, 3);
    assert_eq!(log.navigations.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_retries_are_bounded() {
    let script = Script::default().reply(URL, vec![Reply::Navigating]);
    let (mut session, log) = MockSession::new(script);
    let fetcher = ContentFetcher::default();

    let outcome = fetcher.fetch(&mut session, URL, &plain()).await;

    let error = outcome.result.unwrap_err();
    assert!(error.starts_with(&format!("Error fetching content from {URL}: ")));
    assert!(error.contains("navigating"));
    assert_eq!(log.lock().unwrap().content_calls, 4);
}

#[tokio::test(start_paused = true)]
async fn test_other_failures_are_not_retried() {
    let script = Script::default().reply(URL, vec![Reply::Fail("Target closed".into())]);
    let (mut session, log) = MockSession::new(script);
    let fetcher = ContentFetcher::default();

    let start = Instant::now();
    let outcome = fetcher.fetch(&mut session, URL, &plain()).await;

    assert_eq!(
        outcome.result.unwrap_err(),
        format!("Error fetching content from {URL}: Target closed")
    );
    assert_eq!(log.lock().unwrap().content_calls, 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_waits_then_refetches() {
    let script = Script::default().reply(
        URL,
        vec![
            html("<p>Rate limit is exceeded. Try again in 5 seconds.</p>"),
            html("<p>the real page</p>"),
        ],
    );
    let (mut session, log) = MockSession::new(script);
    let fetcher = ContentFetcher::default();

    let start = Instant::now();
    let outcome = fetcher.fetch(&mut session, URL, &plain()).await;

    assert_eq!(start.elapsed(), Duration::from_secs(5));
    assert_eq!(outcome.display_text(), "<p>the real page</p>");
    let log = log.lock().unwrap();
    assert_eq!(log.navigations, vec![URL.to_string(), URL.to_string()]);
    assert_eq!(log.content_calls, 2);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_cap() {
    let script = Script::default().reply(
        URL,
        vec![html("Rate limit is exceeded. Try again in 2 seconds.")],
    );
    let (mut session, log) = MockSession::new(script);
    let fetcher = ContentFetcher::new(FetchSettings {
        max_rate_limit_retries: Some(2),
        ..Default::default()
    });

    let start = Instant::now();
    let outcome = fetcher.fetch(&mut session, URL, &plain()).await;

    assert_eq!(start.elapsed(), Duration::from_secs(4));
    assert!(outcome
        .result
        .unwrap_err()
        .ends_with("still rate limited after 2 waits"));
    assert_eq!(log.lock().unwrap().navigations.len(), 3);
}

#[tokio::test]
async fn test_unreadable_rate_limit_notice_fails_target() {
    let script = Script::default().reply(
        URL,
        vec![html("Rate limit is exceeded. Try again in soon seconds.")],
    );
    let (mut session, _log) = MockSession::new(script);
    let outcome = ContentFetcher::default()
        .fetch(&mut session, URL, &plain())
        .await;
    assert!(outcome
        .result
        .unwrap_err()
        .contains("unreadable rate limit notice"));
}

#[tokio::test]
async fn test_navigation_failure_is_reported_per_target() {
    let script = Script::default().unreachable(URL);
    let (mut session, log) = MockSession::new(script);
    let outcome = ContentFetcher::default()
        .fetch(&mut session, URL, &plain())
        .await;
    let error = outcome.result.unwrap_err();
    assert!(error.contains("ERR_NAME_NOT_RESOLVED"));
    assert_eq!(log.lock().unwrap().content_calls, 0);
}

#[tokio::test]
async fn test_strip_and_save() {
    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("pages");
    let script = Script::default().reply(
        URL,
        vec![html("<html><body><h1>Title</h1>\n\n\n<p>Body &amp; more</p></body></html>")],
    );
    let (mut session, _log) = MockSession::new(script);
    let options = FetchOptions {
        strip_html: true,
        save_folder: Some(folder.clone()),
    };
    let fetcher = ContentFetcher::default();

    let first = fetcher.fetch(&mut session, URL, &options).await;
    let second = fetcher.fetch(&mut session, URL, &options).await;

    let first = first.result.unwrap();
    let second = second.result.unwrap();
    let first_path = first.saved_path.clone().unwrap();
    let second_path = second.saved_path.clone().unwrap();

    assert_eq!(first_path, folder.join("example-com-article"));
    assert_ne!(first_path, second_path);
    assert_eq!(
        std::fs::read_to_string(&first_path).unwrap(),
        first.normalized.clone().unwrap()
    );
    assert!(first.text().contains("Body & more"));
    assert!(first.raw.contains("<h1>"));
}

#[tokio::test]
async fn test_raw_content_is_saved_when_not_stripping() {
    let dir = TempDir::new().unwrap();
    let script = Script::default().reply(URL, vec![html("<p>raw</p>")]);
    let (mut session, _log) = MockSession::new(script);
    let options = FetchOptions {
        strip_html: false,
        save_folder: Some(dir.path().to_path_buf()),
    };

    let page = ContentFetcher::default()
        .fetch(&mut session, URL, &options)
        .await
        .result
        .unwrap();

    assert!(page.normalized.is_none());
    let saved = std::fs::read_to_string(page.saved_path.unwrap()).unwrap();
    assert_eq!(saved, "<p>raw</p>");
}

#[tokio::test]
async fn test_persistence_failure_fails_only_that_target() {
    let dir = TempDir::new().unwrap();
    let not_a_folder = dir.path().join("occupied");
    std::fs::write(&not_a_folder, "file in the way").unwrap();
    let (mut session, _log) = MockSession::new(Script::default());
    let options = FetchOptions {
        strip_html: true,
        save_folder: Some(not_a_folder),
    };
    let fetcher = ContentFetcher::default();

    let failed = fetcher.fetch(&mut session, URL, &options).await;
    let error = failed.result.unwrap_err();
    assert!(error.contains("failed to save content to"));
    assert!(error.contains("\n  caused by: "));

    let ok = fetcher
        .fetch(&mut session, "https://other.example/", &plain())
        .await;
    assert!(ok.is_success());
}
