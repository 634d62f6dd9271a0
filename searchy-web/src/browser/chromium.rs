//! Headless Chrome backend built on chromiumoxide

use super::{BrowserError, BrowserSession, SessionLauncher};
use crate::chrome::detect_chrome;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use searchy_config::BrowserSettings;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Quiet period the page must hold before it counts as idle
const NETWORK_IDLE_QUIET_MS: u64 = 500;

/// Chrome reports this when content is read across a navigation boundary
const CONTEXT_DESTROYED: &str = "Execution context was destroyed";

/// Launches one Chrome process per run
#[derive(Debug, Clone, Default)]
pub struct ChromiumLauncher {
    settings: BrowserSettings,
}

impl ChromiumLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    async fn launch(&self) -> Result<ChromiumSession, BrowserError> {
        let detection = detect_chrome(self.settings.chrome_path.as_deref());
        let Some(chrome_path) = detection.path.clone() else {
            tracing::error!("Chrome detection failed");
            return Err(BrowserError::Launch(detection.failure_message()));
        };
        tracing::info!(
            "Found Chrome at: {} (via {})",
            chrome_path.display(),
            detection.source.as_deref().unwrap_or("unknown")
        );

        // A fresh profile per run keeps concurrent runs off each other's lock files
        let profile = TempDir::with_prefix("searchy-chrome-")
            .map_err(|e| BrowserError::Launch(format!("failed to create profile dir: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(&chrome_path)
            .user_data_dir(profile.path())
            .window_size(self.settings.window_width, self.settings.window_height)
            .args([
                "--no-sandbox",
                "--disable-dev-shm-usage",
                "--disable-blink-features=AutomationControlled",
                "--no-first-run",
                "--disable-default-apps",
                "--disable-extensions",
                "--disable-features=TranslateUI",
            ]);
        if self.settings.headful {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| BrowserError::Launch(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let Err(e) = event else { continue };
                let error_str = e.to_string();
                // chromiumoxide does not know every CDP message newer Chrome sends
                if error_str.contains("data did not match any variant of untagged enum Message") {
                    continue;
                }
                tracing::debug!("CDP message processing error (continuing): {}", e);
                if error_str.contains("connection closed")
                    || error_str.contains("io error")
                    || error_str.contains("websocket closed")
                    || error_str.contains("transport error")
                {
                    tracing::warn!("Browser connection lost, stopping handler: {}", e);
                    break;
                }
            }
            tracing::debug!("CDP handler task completed");
        });

        let mut session = ChromiumSession {
            browser,
            page: None,
            handler_task,
            network_idle_timeout: Duration::from_millis(self.settings.network_idle_timeout_ms),
            _profile: profile,
        };

        match session.browser.new_page("about:blank").await {
            Ok(page) => {
                session.page = Some(page);
                Ok(session)
            }
            Err(e) => {
                let _ = session.close().await;
                Err(BrowserError::Launch(format!("failed to open page: {e}")))
            }
        }
    }
}

/// A Chrome process with one open tab
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    network_idle_timeout: Duration,
    _profile: TempDir,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, BrowserError> {
        self.page
            .as_ref()
            .ok_or_else(|| BrowserError::Protocol("browser page is closed".to_string()))
    }

    /// Poll `document.readyState` and the resource timeline until both hold still
    async fn settle(&self, page: &Page) -> Result<(), BrowserError> {
        let js = format!(
            r#"(async () => {{
                const timeoutMs = {timeout_ms};
                const idleMs = {idle_ms};
                const interval = 100;
                const start = Date.now();
                let lastCount = 0;
                let stableMs = 0;
                try {{ lastCount = performance.getEntriesByType('resource').length; }} catch (_) {{ lastCount = 0; }}
                while (Date.now() - start < timeoutMs) {{
                    await new Promise(r => setTimeout(r, interval));
                    let curCount = lastCount;
                    try {{ curCount = performance.getEntriesByType('resource').length; }} catch (_) {{ curCount = lastCount; }}
                    if (document.readyState === 'complete' && curCount === lastCount) {{
                        stableMs += interval;
                        if (stableMs >= idleMs) {{ return true; }}
                    }} else {{
                        stableMs = 0;
                    }}
                    lastCount = curCount;
                }}
                return false;
            }})()"#,
            timeout_ms = self.network_idle_timeout.as_millis(),
            idle_ms = NETWORK_IDLE_QUIET_MS,
        );

        let value = page.evaluate(js).await.map_err(classify_cdp)?;
        match value.into_value::<bool>() {
            Ok(true) => tracing::debug!("Network idle reached"),
            _ => tracing::debug!(
                "Network did not go idle within {:?}, continuing",
                self.network_idle_timeout
            ),
        }
        Ok(())
    }
}

fn classify_cdp(error: chromiumoxide::error::CdpError) -> BrowserError {
    let message = error.to_string();
    if message.contains(CONTEXT_DESTROYED) {
        BrowserError::NavigationInProgress(message)
    } else {
        BrowserError::classify(message)
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        tracing::debug!("Navigating to {}", url);
        self.page()?
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn query_all(&mut self, selector: &str) -> Result<Vec<Element>, BrowserError> {
        self.page()?
            .find_elements(selector)
            .await
            .map_err(classify_cdp)
    }

    async fn attribute(
        &mut self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        element.attribute(name).await.map_err(classify_cdp)
    }

    async fn click(&mut self, element: &Element) -> Result<(), BrowserError> {
        element.click().await.map_err(classify_cdp)?;
        Ok(())
    }

    async fn wait_for_network_idle(&mut self) -> Result<(), BrowserError> {
        let page = self.page()?.clone();
        let navigation = tokio::time::timeout(self.network_idle_timeout, page.wait_for_navigation());
        if navigation.await.is_err() {
            tracing::debug!("No navigation finished within {:?}", self.network_idle_timeout);
        }
        self.settle(&page).await
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.page()?.content().await.map_err(classify_cdp)
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        tracing::debug!("Cleaning up browser resources");
        self.page = None;
        let result = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Protocol(e.to_string()));
        if let Err(e) = &result {
            tracing::debug!("Browser close error (ignored): {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        result
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        self.handler_task.abort();
    }
}
