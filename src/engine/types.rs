//! Values produced and consumed by the escalation engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

use crate::config::FetchConfig;

/// The four strategy levels, in escalation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyName {
    Plain,
    Structured,
    HeadlessRender,
    HeadfulRender,
}

impl StrategyName {
    pub const ALL: [Self; 4] = [
        Self::Plain,
        Self::Structured,
        Self::HeadlessRender,
        Self::HeadfulRender,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Structured => "structured",
            Self::HeadlessRender => "headless_render",
            Self::HeadfulRender => "headful_render",
        }
    }

    #[must_use]
    pub fn is_render(self) -> bool {
        matches!(self, Self::HeadlessRender | Self::HeadfulRender)
    }
}

impl fmt::Display for StrategyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single strategy attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    Success,
    EmptyContent,
    BotDetected,
    TransportError,
    RenderError,
}

/// Result of exactly one strategy attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyOutcome {
    pub strategy: StrategyName,
    pub status: StrategyStatus,
    pub text: Option<String>,
    pub word_count: Option<usize>,
    pub raw_html: Option<String>,
    /// URL after redirects or in-page navigation
    pub final_url: Option<String>,
    pub error: Option<String>,
}

impl StrategyOutcome {
    fn bare(strategy: StrategyName, status: StrategyStatus) -> Self {
        Self {
            strategy,
            status,
            text: None,
            word_count: None,
            raw_html: None,
            final_url: None,
            error: None,
        }
    }

    /// A failure with no content, carrying `error`
    #[must_use]
    pub fn failed(strategy: StrategyName, status: StrategyStatus, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::bare(strategy, status)
        }
    }

    /// Content produced by the level; `status` says whether it passed
    #[must_use]
    pub fn with_text(strategy: StrategyName, status: StrategyStatus, text: String) -> Self {
        Self {
            word_count: Some(crate::quality_gate::word_count(&text)),
            text: Some(text),
            ..Self::bare(strategy, status)
        }
    }

    /// Raw markup fetched by the plain level
    #[must_use]
    pub fn fetched(html: String, final_url: String) -> Self {
        Self {
            raw_html: Some(html),
            final_url: Some(final_url),
            ..Self::bare(StrategyName::Plain, StrategyStatus::Success)
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == StrategyStatus::Success
    }

    #[must_use]
    pub fn summary(&self) -> AttemptSummary {
        AttemptSummary {
            strategy: self.strategy,
            status: self.status,
            word_count: self.word_count,
            error: self.error.clone(),
        }
    }
}

/// Diagnostic record of one attempt, kept on the result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptSummary {
    pub strategy: StrategyName,
    pub status: StrategyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The level that produced the final result, or `FailedAll`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyUsed {
    Plain,
    Structured,
    HeadlessRender,
    HeadfulRender,
    FailedAll,
}

impl From<StrategyName> for StrategyUsed {
    fn from(name: StrategyName) -> Self {
        match name {
            StrategyName::Plain => Self::Plain,
            StrategyName::Structured => Self::Structured,
            StrategyName::HeadlessRender => Self::HeadlessRender,
            StrategyName::HeadfulRender => Self::HeadfulRender,
        }
    }
}

impl StrategyUsed {
    #[must_use]
    pub fn note(self) -> &'static str {
        match self {
            Self::Plain | Self::Structured => {
                "Clean text via structured extraction + content extractor"
            }
            Self::HeadlessRender => "JS-rendered via headless browser + content extractor",
            Self::HeadfulRender => "Interactive via headful browser + content extractor",
            Self::FailedAll => "All fallback methods failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStatus {
    Success,
    Error,
}

/// Terminal outcome of one retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub url: String,
    pub strategy_used: StrategyUsed,
    pub text: String,
    pub status: RetrievalStatus,
    pub note: String,
    pub attempts: Vec<AttemptSummary>,
}

impl RetrievalResult {
    pub(crate) fn accepted(url: &str, outcome: StrategyOutcome, attempts: Vec<AttemptSummary>) -> Self {
        let strategy_used = StrategyUsed::from(outcome.strategy);
        Self {
            url: url.to_string(),
            strategy_used,
            text: outcome.text.unwrap_or_default(),
            status: RetrievalStatus::Success,
            note: strategy_used.note().to_string(),
            attempts,
        }
    }

    pub(crate) fn failed_all(url: &str, note: impl Into<String>, attempts: Vec<AttemptSummary>) -> Self {
        Self {
            url: url.to_string(),
            strategy_used: StrategyUsed::FailedAll,
            text: String::new(),
            status: RetrievalStatus::Error,
            note: note.into(),
            attempts,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == RetrievalStatus::Success
    }
}

/// Immutable input to one retrieval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    pub url: Url,
    pub max_retries: u32,
    pub timeout_ms: u64,
}

impl RetrievalRequest {
    /// Parse `url` and take retry settings from `config`
    ///
    /// # Errors
    ///
    /// Returns the parse error for a malformed or relative URL.
    pub fn from_config(url: &str, config: &FetchConfig) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(url.trim())?,
            max_retries: config.max_retries(),
            timeout_ms: config.timeout_ms(),
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
