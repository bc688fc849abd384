//! The escalation engine
//!
//! Runs the levels in order, applying `transition` after each, and owns the
//! release of the HTTP transport when it is scoped to a single retrieval.

use std::sync::Arc;
use tracing::{debug, info};

use super::levels::{RenderLevel, render_disabled, run_plain, run_render, run_structured};
use super::transitions::{EscalationState, Transition, transition};
use super::types::{RetrievalRequest, RetrievalResult, StrategyName, StrategyOutcome, StrategyUsed};
use crate::config::FetchConfig;
use crate::extractor::{DensityExtractor, Extractor};
use crate::render::{ChromiumRenderer, Renderer};
use crate::transport::{HttpTransport, RetryPolicy, Transport};

/// Who closes the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionScope {
    /// The engine closes the transport when leaving the HTTP levels and on return
    PerRetrieval,
    /// The caller (the batch driver) closes the transport once when done
    Shared,
}

/// Progressive fallback retrieval over pluggable transport, renderer and extractor
///
/// Cloning is cheap; clones share the same components.
#[derive(Clone)]
pub struct FallbackEngine {
    config: Arc<FetchConfig>,
    transport: Arc<dyn Transport>,
    renderer: Arc<dyn Renderer>,
    extractor: Arc<dyn Extractor>,
    scope: SessionScope,
}

impl FallbackEngine {
    /// Engine backed by reqwest, Chromium and the density extractor
    #[must_use]
    pub fn new(config: FetchConfig) -> Self {
        let transport = Arc::new(HttpTransport::new(config.user_agent()));
        let renderer = Arc::new(ChromiumRenderer::from_config(&config));
        Self::with_components(config, transport, renderer, Arc::new(DensityExtractor))
    }

    #[must_use]
    pub fn with_components(
        config: FetchConfig,
        transport: Arc<dyn Transport>,
        renderer: Arc<dyn Renderer>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            renderer,
            extractor,
            scope: SessionScope::PerRetrieval,
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: SessionScope) -> Self {
        self.scope = scope;
        self
    }

    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    #[must_use]
    pub fn scope(&self) -> SessionScope {
        self.scope
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Retrieve `url` with the configured retry settings
    ///
    /// A URL that does not parse yields a `failed_all` result without any
    /// network activity.
    pub async fn fetch_url(&self, url: &str) -> RetrievalResult {
        match RetrievalRequest::from_config(url, &self.config) {
            Ok(request) => self.fetch(&request).await,
            Err(e) => {
                info!(url = %url, "Rejected invalid URL: {}", e);
                RetrievalResult::failed_all(url, format!("Invalid URL: {e}"), Vec::new())
            }
        }
    }

    /// Run the escalation chain for one request
    pub async fn fetch(&self, request: &RetrievalRequest) -> RetrievalResult {
        let result = self.escalate(request).await;
        self.release_transport().await;
        result
    }

    async fn escalate(&self, request: &RetrievalRequest) -> RetrievalResult {
        let url = request.url.as_str();
        let min_words = self.config.min_words();
        let mut attempts = Vec::with_capacity(StrategyName::ALL.len());
        let mut fetched: Option<StrategyOutcome> = None;
        let mut state = EscalationState::START;

        while let EscalationState::Running(strategy) = state {
            let outcome = self.run_level(strategy, request, fetched.as_ref()).await;
            attempts.push(outcome.summary());

            match transition(&outcome, min_words) {
                Transition::Accept => {
                    info!(url = %url, strategy = %strategy, "Accepted content");
                    return RetrievalResult::accepted(url, outcome, attempts);
                }
                Transition::Advance(next) => {
                    if let EscalationState::Running(next_strategy) = next {
                        info!(
                            url = %url,
                            "Escalating {} -> {} ({:?})",
                            strategy,
                            next_strategy,
                            outcome.status
                        );
                        if next_strategy.is_render() && !strategy.is_render() {
                            self.release_transport().await;
                        }
                    }
                    if strategy == StrategyName::Plain {
                        fetched = Some(outcome);
                    }
                    state = next;
                }
            }
        }

        info!(url = %url, "All fallback methods failed");
        RetrievalResult::failed_all(url, StrategyUsed::FailedAll.note(), attempts)
    }

    async fn run_level(
        &self,
        strategy: StrategyName,
        request: &RetrievalRequest,
        fetched: Option<&StrategyOutcome>,
    ) -> StrategyOutcome {
        debug!(url = %request.url, strategy = %strategy, "Running level");
        match strategy {
            StrategyName::Plain => {
                let policy = RetryPolicy::from_config(&self.config)
                    .with_limits(request.max_retries, request.timeout());
                run_plain(self.transport.as_ref(), &request.url, &policy).await
            }
            StrategyName::Structured => {
                let (html, base) = fetched
                    .and_then(|f| f.raw_html.as_deref().zip(f.final_url.as_deref()))
                    .unwrap_or(("", request.url.as_str()));
                run_structured(html, base, self.extractor.as_ref())
            }
            StrategyName::HeadlessRender | StrategyName::HeadfulRender => {
                if strategy == StrategyName::HeadfulRender && !self.config.enable_headful() {
                    return render_disabled(strategy, "headful");
                }
                let Some(profile) = self.config.profile_for(strategy) else {
                    return render_disabled(strategy, "unconfigured");
                };
                let level = RenderLevel {
                    strategy,
                    profile,
                    extractor: self.extractor.as_ref(),
                    bot_markers: self.config.bot_markers(),
                    min_render_chars: self.config.min_render_chars(),
                };
                run_render(self.renderer.as_ref(), &request.url, &level).await
            }
        }
    }

    async fn release_transport(&self) {
        if self.scope == SessionScope::PerRetrieval {
            self.transport.close().await;
        }
    }
}
