//! Live network and browser tests
//!
//! Run with `cargo test --test live_fetch_test -- --ignored`. They need
//! network access and a local or downloadable Chrome.

use kodegen_tools_resilient_fetch::{
    ChromiumRenderer, FetchConfig, RenderProfile, Renderer, RetrievalStatus, fetch,
};
use url::Url;

#[tokio::test]
#[ignore = "requires network access and Chrome"]
async fn test_example_domain_end_to_end() {
    let config = FetchConfig::builder()
        .enable_headful(false)
        .build()
        .expect("config");

    let result = fetch("https://example.com", config).await;

    assert_eq!(result.status, RetrievalStatus::Success);
    assert!(result.text.contains("Example Domain"));
}

#[tokio::test]
#[ignore = "requires Chrome"]
async fn test_chromium_renderer_releases_browser() {
    let renderer = ChromiumRenderer::new(
        kodegen_tools_resilient_fetch::utils::CHROME_USER_AGENT,
        None,
    );
    let stats = renderer.stats();
    let url = Url::parse("https://example.com/").expect("url");

    let page = renderer
        .render(&url, &RenderProfile::headless())
        .await
        .expect("render");

    assert!(page.html.contains("Example Domain"));
    assert_eq!(stats.launches(), 1);
    assert_eq!(stats.closes(), 1);
}
