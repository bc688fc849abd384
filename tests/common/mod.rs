//! Test utilities and scripted collaborators for the resilient fetch suite

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use kodegen_tools_resilient_fetch::render::{Releasable, with_resource};
use kodegen_tools_resilient_fetch::{
    Extractor, FallbackEngine, FetchConfig, HttpResponse, RenderError, RenderProfile,
    RenderedPage, Renderer, Transport, TransportError,
};

/// Config with a 1ms backoff unit so retries do not slow the suite down
pub fn test_config() -> FetchConfig {
    FetchConfig::builder()
        .retry_backoff_unit(Duration::from_millis(1))
        .build()
        .expect("test config is valid")
}

/// An article page with `words` words of body text
pub fn article_html(title: &str, words: usize) -> String {
    let sentence = "rivers carve valleys slowly as water moves sediment downstream over time";
    let tokens: Vec<&str> = sentence.split(' ').cycle().take(words).collect();
    let paragraphs: Vec<String> = tokens
        .chunks(40)
        .map(|chunk| format!("<p>{}.</p>", chunk.join(" ")))
        .collect();
    format!(
        "<!DOCTYPE html><html><head><title>{title}</title></head><body>\
         <nav><a href=\"/\">Home</a></nav><article>{}</article>\
         <footer>Footer links</footer></body></html>",
        paragraphs.join("")
    )
}

/// The short static page served at example.com
pub fn example_domain_html() -> String {
    r#"<!doctype html>
<html>
<head><title>Example Domain</title></head>
<body>
<div>
    <h1>Example Domain</h1>
    <p>This domain is for use in illustrative examples in documents. You may use this
    domain in literature without prior coordination or asking for permission.</p>
    <p><a href="https://www.iana.org/domains/example">More information...</a></p>
</div>
</body>
</html>"#
        .to_string()
}

/// Tracks how many guarded sections run at once
#[derive(Debug, Default)]
pub struct ConcurrencyTracker {
    active: AtomicUsize,
    peak: AtomicUsize,
}

pub struct ActiveGuard<'a>(&'a ConcurrencyTracker);

impl ConcurrencyTracker {
    pub fn enter(&self) -> ActiveGuard<'_> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        ActiveGuard(self)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One scripted HTTP exchange
#[derive(Debug, Clone)]
pub enum Reply {
    Page(u16, String),
    Fail(String),
    Panic,
}

/// Transport replaying per-URL reply sequences; the last reply repeats
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<String, Vec<Reply>>,
    served: Mutex<HashMap<String, usize>>,
    pub calls: AtomicUsize,
    pub closes: AtomicUsize,
    pub tracker: Arc<ConcurrencyTracker>,
    pub delay: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, replies: Vec<Reply>) -> Self {
        let key = Url::parse(url).expect("route url").to_string();
        self.routes.insert(key, replies);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_tracker(mut self, tracker: Arc<ConcurrencyTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    fn next_reply(&self, url: &Url) -> Reply {
        let key = url.to_string();
        let Some(replies) = self.routes.get(&key) else {
            return Reply::Fail(format!("no route for {key}"));
        };
        let mut served = self.served.lock().expect("served lock");
        let index = served.entry(key).or_insert(0);
        let reply = replies
            .get(*index)
            .or_else(|| replies.last())
            .cloned()
            .unwrap_or_else(|| Reply::Fail("empty route".to_string()));
        *index += 1;
        reply
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn fetch(&self, url: &Url, _timeout: Duration) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _active = self.tracker.enter();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.next_reply(url) {
            Reply::Page(status, body) => Ok(HttpResponse {
                status,
                body,
                headers: vec![("content-type".to_string(), "text/html".to_string())],
                final_url: url.to_string(),
            }),
            Reply::Fail(message) => Err(TransportError::Request(message)),
            Reply::Panic => panic!("transport blew up on {url}"),
        }
    }

    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// One scripted render
#[derive(Debug, Clone)]
pub enum RenderReply {
    Page { html: String, body_text: String, final_url: Option<String> },
    Fail(RenderError),
}

impl RenderReply {
    pub fn page(html: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self::Page {
            html: html.into(),
            body_text: body_text.into(),
            final_url: None,
        }
    }

    pub fn redirected(html: impl Into<String>, final_url: &str) -> Self {
        Self::Page {
            html: html.into(),
            body_text: String::new(),
            final_url: Some(final_url.to_string()),
        }
    }
}

struct MockBrowser {
    closes: Arc<AtomicUsize>,
}

impl Releasable for MockBrowser {
    async fn release(self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Renderer replaying per-(URL, level) replies through a counted fake browser
#[derive(Default)]
pub struct MockRenderer {
    headless: HashMap<String, RenderReply>,
    headful: HashMap<String, RenderReply>,
    pub headless_calls: AtomicUsize,
    pub headful_calls: AtomicUsize,
    pub launches: AtomicUsize,
    pub closes: Arc<AtomicUsize>,
    pub tracker: Arc<ConcurrencyTracker>,
    pub delay: Duration,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headless(mut self, url: &str, reply: RenderReply) -> Self {
        self.headless.insert(Url::parse(url).expect("url").to_string(), reply);
        self
    }

    pub fn headful(mut self, url: &str, reply: RenderReply) -> Self {
        self.headful.insert(Url::parse(url).expect("url").to_string(), reply);
        self
    }

    pub fn with_tracker(mut self, tracker: Arc<ConcurrencyTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn headless_calls(&self) -> usize {
        self.headless_calls.load(Ordering::SeqCst)
    }

    pub fn headful_calls(&self) -> usize {
        self.headful_calls.load(Ordering::SeqCst)
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn render(&self, url: &Url, profile: &RenderProfile) -> Result<RenderedPage, RenderError> {
        let _active = self.tracker.enter();
        let routes = if profile.headless {
            self.headless_calls.fetch_add(1, Ordering::SeqCst);
            &self.headless
        } else {
            self.headful_calls.fetch_add(1, Ordering::SeqCst);
            &self.headful
        };
        let reply = routes
            .get(url.as_str())
            .cloned()
            .unwrap_or_else(|| RenderReply::Fail(RenderError::Navigation("no route".to_string())));

        self.launches.fetch_add(1, Ordering::SeqCst);
        let browser = MockBrowser {
            closes: Arc::clone(&self.closes),
        };
        let url = url.to_string();
        let delay = self.delay;

        with_resource(browser, move |_browser| {
            Box::pin(async move {
                if delay.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(delay).await;
                }
                match reply {
                    RenderReply::Page { html, body_text, final_url } => Ok(RenderedPage {
                        html,
                        body_text,
                        final_url: final_url.unwrap_or(url),
                    }),
                    RenderReply::Fail(e) => Err(e),
                }
            })
        })
        .await
    }
}

/// Extractor that never produces output, so the baseline text is used
pub struct NoExtractor;

impl Extractor for NoExtractor {
    fn extract(&self, _html: &str, _base_url: Option<&str>) -> Option<String> {
        None
    }
}

pub fn engine_with(
    config: FetchConfig,
    transport: &Arc<MockTransport>,
    renderer: &Arc<MockRenderer>,
) -> FallbackEngine {
    FallbackEngine::with_components(
        config,
        Arc::clone(transport) as Arc<dyn Transport>,
        Arc::clone(renderer) as Arc<dyn Renderer>,
        Arc::new(kodegen_tools_resilient_fetch::DensityExtractor),
    )
}
