//! Discovery output is sanitized before it reaches the batch driver

mod common;

use async_trait::async_trait;
use common::{MockRenderer, MockTransport, Reply, article_html, engine_with, test_config};
use kodegen_tools_resilient_fetch::{
    DiscoveryResult, DiscoveryStatus, UrlDiscovery, discover_and_fetch,
};
use std::sync::Arc;

struct FixedDiscovery(DiscoveryResult);

#[async_trait]
impl UrlDiscovery for FixedDiscovery {
    async fn search(&self, _query: &str, _num_results: usize) -> DiscoveryResult {
        self.0.clone()
    }
}

fn discovered(urls: &[&str], status: DiscoveryStatus) -> FixedDiscovery {
    FixedDiscovery(DiscoveryResult {
        urls: urls.iter().map(|u| (*u).to_string()).collect(),
        status,
    })
}

#[tokio::test]
async fn test_untrusted_urls_cleaned_before_fetch() {
    let transport = Arc::new(
        MockTransport::new()
            .route("https://a.test/x", vec![Reply::Page(200, article_html("A", 150))])
            .route("https://b.test/", vec![Reply::Page(200, article_html("B", 150))]),
    );
    let renderer = Arc::new(MockRenderer::new());
    let engine = engine_with(test_config(), &transport, &renderer);
    let discovery = discovered(
        &[
            "https://a.test/x#section",
            "/relative/link",
            " https://a.test/x ",
            "javascript:void(0)",
            "https://b.test/",
        ],
        DiscoveryStatus::Success,
    );

    let report = discover_and_fetch(&discovery, "rivers", 10, &engine, 2).await;

    let fetched: Vec<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(fetched, ["https://a.test/x", "https://b.test/"]);
    assert_eq!(report.successes(), 2);
}

#[tokio::test]
async fn test_result_count_truncated() {
    let transport = Arc::new(
        MockTransport::new().route("https://a.test/", vec![Reply::Page(200, article_html("A", 150))]),
    );
    let renderer = Arc::new(MockRenderer::new());
    let engine = engine_with(test_config(), &transport, &renderer);
    let discovery = discovered(
        &["https://a.test/", "https://b.test/", "https://c.test/"],
        DiscoveryStatus::Success,
    );

    let report = discover_and_fetch(&discovery, "q", 1, &engine, 4).await;

    assert_eq!(report.results.len(), 1);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_failed_discovery_fetches_nothing() {
    let transport = Arc::new(MockTransport::new());
    let renderer = Arc::new(MockRenderer::new());
    let engine = engine_with(test_config(), &transport, &renderer);
    let discovery = discovered(&["https://a.test/"], DiscoveryStatus::Error);

    let report = discover_and_fetch(&discovery, "q", 5, &engine, 2).await;

    assert!(report.results.is_empty());
    assert_eq!(transport.calls(), 0);
}
