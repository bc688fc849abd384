//! Resilient page retrieval
//!
//! Fetches readable text from arbitrary URLs by escalating through plain HTTP,
//! structured extraction, headless Chrome and headful Chrome until the content
//! passes the quality gate.

pub mod batch;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod extractor;
pub mod quality_gate;
pub mod render;
pub mod session;
pub mod transport;
pub mod utils;

pub use batch::{BatchReport, DroppedRetrieval, run_batch, run_batch_report};
pub use config::{ConfigError, FetchConfig, FetchConfigBuilder};
pub use discovery::{DiscoveryResult, DiscoveryStatus, UrlDiscovery, discover_and_fetch};
pub use engine::{
    AttemptSummary, FallbackEngine, RetrievalRequest, RetrievalResult, RetrievalStatus,
    SessionScope, StrategyName, StrategyOutcome, StrategyStatus, StrategyUsed,
};
pub use extractor::{DensityExtractor, Extractor, safe_extract};
pub use quality_gate::{is_acceptable, looks_bot_blocked, meets_render_bar, word_count};
pub use render::{
    ChromiumRenderer, RenderError, RenderProfile, RenderStats, RenderedPage, Renderer,
    WaitCondition,
};
pub use session::{ChromiumSession, InteractiveSession, SessionId, SessionRegistry};
pub use transport::{HttpResponse, HttpTransport, Transport, TransportError};

/// Retrieve one URL with the default components
pub async fn fetch(url: &str, config: FetchConfig) -> RetrievalResult {
    FallbackEngine::new(config).fetch_url(url).await
}

/// Retrieve many URLs with the default components, bounded by `config.max_concurrent()`
pub async fn fetch_many(urls: &[String], config: FetchConfig) -> BatchReport {
    let max_concurrent = config.max_concurrent();
    let engine = FallbackEngine::new(config);
    run_batch_report(&engine, urls, max_concurrent).await
}
