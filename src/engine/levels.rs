//! The four strategy levels
//!
//! Each level contains its own faults: the return value is always a
//! `StrategyOutcome`, never an error.

use tracing::{debug, info, warn};
use url::Url;

use super::types::{StrategyName, StrategyOutcome, StrategyStatus};
use crate::extractor::{Extractor, safe_extract, structured_extract};
use crate::quality_gate::{looks_bot_blocked, meets_render_bar};
use crate::render::{RenderError, RenderProfile, RenderedPage, Renderer};
use crate::transport::{RetryPolicy, Transport, fetch_with_retry};

/// Level 1: GET with retries
pub async fn run_plain(transport: &dyn Transport, url: &Url, policy: &RetryPolicy) -> StrategyOutcome {
    match fetch_with_retry(transport, url, policy).await {
        Ok(response) => {
            debug!(url = %url, status = response.status, "Plain fetch succeeded");
            StrategyOutcome::fetched(response.body, response.final_url)
        }
        Err(e) => {
            info!(url = %url, "Plain fetch failed: {}", e);
            StrategyOutcome::failed(StrategyName::Plain, StrategyStatus::TransportError, e.to_string())
        }
    }
}

/// Level 2: structured extraction over the markup from level 1
pub fn run_structured(html: &str, base_url: &str, extractor: &dyn Extractor) -> StrategyOutcome {
    let extracted = structured_extract(html, Some(base_url), extractor);
    let status = if extracted.text.trim().is_empty() {
        StrategyStatus::EmptyContent
    } else {
        StrategyStatus::Success
    };
    StrategyOutcome::with_text(StrategyName::Structured, status, extracted.text)
}

/// Inputs shared by both render levels
pub struct RenderLevel<'a> {
    pub strategy: StrategyName,
    pub profile: &'a RenderProfile,
    pub extractor: &'a dyn Extractor,
    pub bot_markers: &'a [String],
    pub min_render_chars: usize,
}

/// Levels 3 and 4: render, check for a challenge page, extract, apply the char bar
pub async fn run_render(renderer: &dyn Renderer, url: &Url, level: &RenderLevel<'_>) -> StrategyOutcome {
    match renderer.render(url, level.profile).await {
        Ok(page) => evaluate_rendered(url, page, level),
        Err(e) => {
            warn!(url = %url, strategy = %level.strategy, "Render failed: {}", e);
            StrategyOutcome::failed(level.strategy, StrategyStatus::RenderError, e.to_string())
        }
    }
}

/// Level outcome for a disabled render level
#[must_use]
pub fn render_disabled(strategy: StrategyName, label: &'static str) -> StrategyOutcome {
    StrategyOutcome::failed(
        strategy,
        StrategyStatus::RenderError,
        RenderError::Disabled(label).to_string(),
    )
}

fn evaluate_rendered(url: &Url, page: RenderedPage, level: &RenderLevel<'_>) -> StrategyOutcome {
    if looks_bot_blocked(&page.html, &page.final_url, url.as_str(), level.bot_markers) {
        info!(url = %url, final_url = %page.final_url, strategy = %level.strategy, "Bot challenge detected");
        let mut outcome = StrategyOutcome::failed(
            level.strategy,
            StrategyStatus::BotDetected,
            format!("bot challenge detected at {}", page.final_url),
        );
        outcome.final_url = Some(page.final_url);
        outcome.raw_html = Some(page.html);
        return outcome;
    }

    let text = safe_extract(level.extractor, &page.html, Some(&page.final_url))
        .unwrap_or(page.body_text);

    let status = if meets_render_bar(&text, level.min_render_chars) {
        StrategyStatus::Success
    } else {
        StrategyStatus::EmptyContent
    };

    let mut outcome = StrategyOutcome::with_text(level.strategy, status, text);
    outcome.final_url = Some(page.final_url);
    outcome.raw_html = Some(page.html);
    outcome
}
