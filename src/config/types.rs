//! Core configuration types for resilient fetching
//!
//! This module contains the main `FetchConfig` struct that parameterizes the
//! transport retry policy, the quality gate thresholds and both render levels.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::render::RenderProfile;

/// Main configuration struct for fallback retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Attempts per HTTP retrieval (at least 1)
    pub(crate) max_retries: u32,

    /// Total timeout for one HTTP attempt, in milliseconds
    pub(crate) timeout_ms: u64,

    /// Linear backoff unit: after failed attempt `i` the transport sleeps
    /// `(i + 1) * retry_backoff_unit` before the next one.
    ///
    /// Default: 1 second
    pub(crate) retry_backoff_unit: Duration,

    /// Structured extraction succeeds only with strictly more words than this
    ///
    /// Default: 100
    pub(crate) min_words: usize,

    /// Rendered text succeeds only with strictly more stripped chars than this
    ///
    /// Default: 50
    pub(crate) min_render_chars: usize,

    /// Width of the batch admission gate
    ///
    /// Default: 10
    pub(crate) max_concurrent: usize,

    /// User agent shared by the HTTP transport and the browser context
    pub(crate) user_agent: String,

    /// Level 3 browser configuration
    pub(crate) headless_profile: RenderProfile,

    /// Level 4 browser configuration
    pub(crate) headful_profile: RenderProfile,

    /// Run Level 4 at all. Headful Chrome needs a display; when disabled the
    /// level is recorded as a render error and the engine ends at `FailedAll`.
    pub(crate) enable_headful: bool,

    /// Parent directory for per-launch Chrome profiles.
    /// `None` places them in the system temp directory.
    pub(crate) chrome_data_dir: Option<PathBuf>,

    /// Case-insensitive markers identifying a bot challenge page
    pub(crate) bot_markers: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        // The default builder always validates
        super::FetchConfigBuilder::default().into_config()
    }
}

/// Configuration validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be a positive integer")]
    NotPositive { field: &'static str },

    #[error("user agent must not be empty")]
    EmptyUserAgent,

    #[error("{profile} render profile has a zero navigation timeout")]
    ZeroNavigationTimeout { profile: &'static str },
}
