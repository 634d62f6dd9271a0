//! Scripted browser session for driving the retrieval pipeline without Chrome

#![allow(dead_code)]

use async_trait::async_trait;
use searchy_web::{
    BingExtractor, BrowserError, BrowserSession, GoogleExtractor, ResultExtractor,
    SessionLauncher,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// One scripted answer to `content()`
#[derive(Debug, Clone)]
pub enum Reply {
    Html(String),
    Navigating,
    Fail(String),
}

pub fn html(body: &str) -> Reply {
    Reply::Html(body.to_string())
}

/// What the fake browser serves
#[derive(Debug, Clone, Default)]
pub struct Script {
    /// Result pages in order; each entry is one anchor's href (None = no href)
    pub result_pages: Vec<Vec<Option<String>>>,
    /// Replies to `content()` per URL; the last reply repeats
    pub replies: HashMap<String, Vec<Reply>>,
    /// URLs whose navigation fails
    pub unreachable: Vec<String>,
    /// Fail every result-anchor query
    pub broken_results: bool,
    /// `content()` never returns
    pub stall: bool,
}

impl Script {
    pub fn with_results(pages: Vec<Vec<&str>>) -> Self {
        Self {
            result_pages: pages
                .into_iter()
                .map(|page| page.into_iter().map(|href| Some(href.to_string())).collect())
                .collect(),
            ..Default::default()
        }
    }

    pub fn reply(mut self, url: &str, replies: Vec<Reply>) -> Self {
        self.replies.insert(url.to_string(), replies);
        self
    }

    pub fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.to_string());
        self
    }
}

/// Everything the fake browser was asked to do
#[derive(Debug, Default)]
pub struct Log {
    pub launches: usize,
    pub navigations: Vec<String>,
    pub content_calls: usize,
    pub clicks: usize,
    pub idle_waits: usize,
    pub closes: usize,
}

#[derive(Debug, Clone)]
pub enum MockElement {
    Anchor(Option<String>),
    Next,
}

pub struct MockSession {
    script: Script,
    log: Arc<Mutex<Log>>,
    current: Option<String>,
    page: usize,
    pending: HashMap<String, VecDeque<Reply>>,
}

impl MockSession {
    pub fn new(script: Script) -> (Self, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        (Self::with_log(script, log.clone()), log)
    }

    fn with_log(script: Script, log: Arc<Mutex<Log>>) -> Self {
        let pending = script
            .replies
            .iter()
            .map(|(url, replies)| (url.clone(), replies.iter().cloned().collect()))
            .collect();
        Self {
            script,
            log,
            current: None,
            page: 0,
            pending,
        }
    }

    fn is_next_selector(selector: &str) -> bool {
        selector == GoogleExtractor.next_selector() || selector == BingExtractor.next_selector()
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    type Element = MockElement;

    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.log.lock().unwrap().navigations.push(url.to_string());
        if self.script.unreachable.iter().any(|u| u == url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        self.current = Some(url.to_string());
        self.page = 0;
        Ok(())
    }

    async fn query_all(&mut self, selector: &str) -> Result<Vec<MockElement>, BrowserError> {
        if Self::is_next_selector(selector) {
            let more = self.page + 1 < self.script.result_pages.len();
            return Ok(if more { vec![MockElement::Next] } else { vec![] });
        }
        if self.script.broken_results {
            return Err(BrowserError::Protocol("selector engine crashed".to_string()));
        }
        Ok(self
            .script
            .result_pages
            .get(self.page)
            .map(|anchors| anchors.iter().cloned().map(MockElement::Anchor).collect())
            .unwrap_or_default())
    }

    async fn attribute(
        &mut self,
        element: &MockElement,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        match element {
            MockElement::Anchor(href) if name == "href" => Ok(href.clone()),
            _ => Ok(None),
        }
    }

    async fn click(&mut self, element: &MockElement) -> Result<(), BrowserError> {
        self.log.lock().unwrap().clicks += 1;
        match element {
            MockElement::Next => {
                self.page += 1;
                Ok(())
            }
            MockElement::Anchor(_) => Err(BrowserError::Protocol("unexpected click".into())),
        }
    }

    async fn wait_for_network_idle(&mut self) -> Result<(), BrowserError> {
        self.log.lock().unwrap().idle_waits += 1;
        Ok(())
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.log.lock().unwrap().content_calls += 1;
        if self.script.stall {
            std::future::pending::<()>().await;
        }
        let url = self.current.clone().unwrap_or_default();
        let reply = match self.pending.get_mut(&url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Reply::Html(body)) => Ok(body),
            Some(Reply::Navigating) => Err(BrowserError::classify(
                "Unable to retrieve content because the page is navigating and changing the content.",
            )),
            Some(Reply::Fail(message)) => Err(BrowserError::classify(message)),
            None => Ok(format!("<html><body><p>Content of {url}</p></body></html>")),
        }
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.log.lock().unwrap().closes += 1;
        Ok(())
    }
}

/// Hands out [`MockSession`]s sharing one log
#[derive(Clone)]
pub struct MockLauncher {
    script: Script,
    pub log: Arc<Mutex<Log>>,
    fail: bool,
}

impl MockLauncher {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            log: Arc::new(Mutex::new(Log::default())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Script::default())
        }
    }

    pub fn launches(&self) -> usize {
        self.log.lock().unwrap().launches
    }

    pub fn closes(&self) -> usize {
        self.log.lock().unwrap().closes
    }
}

#[async_trait]
impl SessionLauncher for MockLauncher {
    type Session = MockSession;

    async fn launch(&self) -> Result<MockSession, BrowserError> {
        self.log.lock().unwrap().launches += 1;
        if self.fail {
            return Err(BrowserError::Launch("Chrome/Chromium not found".to_string()));
        }
        Ok(MockSession::with_log(self.script.clone(), self.log.clone()))
    }
}
