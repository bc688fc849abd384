//! Fluent builder for `FetchConfig`
//!
//! Every field has a default, so `FetchConfig::builder().build()` is always
//! valid. `build()` rejects zero retry counts, zero timeouts, a zero admission
//! gate and an empty user agent.

use std::path::PathBuf;
use std::time::Duration;

use super::types::{ConfigError, FetchConfig};
use crate::render::RenderProfile;
use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_BOT_MARKERS, DEFAULT_MAX_CONCURRENT, DEFAULT_MAX_RETRIES,
    DEFAULT_MIN_RENDER_CHARS, DEFAULT_MIN_WORDS, DEFAULT_RETRY_BACKOFF_UNIT, DEFAULT_TIMEOUT_MS,
};

#[derive(Debug, Clone)]
pub struct FetchConfigBuilder {
    max_retries: u32,
    timeout_ms: u64,
    retry_backoff_unit: Duration,
    min_words: usize,
    min_render_chars: usize,
    max_concurrent: usize,
    user_agent: String,
    headless_profile: RenderProfile,
    headful_profile: RenderProfile,
    enable_headful: bool,
    chrome_data_dir: Option<PathBuf>,
    bot_markers: Vec<String>,
}

impl Default for FetchConfigBuilder {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            retry_backoff_unit: DEFAULT_RETRY_BACKOFF_UNIT,
            min_words: DEFAULT_MIN_WORDS,
            min_render_chars: DEFAULT_MIN_RENDER_CHARS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            user_agent: CHROME_USER_AGENT.to_string(),
            headless_profile: RenderProfile::headless(),
            headful_profile: RenderProfile::headful(),
            enable_headful: true,
            chrome_data_dir: None,
            bot_markers: DEFAULT_BOT_MARKERS.iter().map(|m| (*m).to_string()).collect(),
        }
    }
}

impl FetchConfig {
    /// Start building a configuration from defaults
    #[must_use]
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::default()
    }
}

impl FetchConfigBuilder {
    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn retry_backoff_unit(mut self, unit: Duration) -> Self {
        self.retry_backoff_unit = unit;
        self
    }

    #[must_use]
    pub fn min_words(mut self, min_words: usize) -> Self {
        self.min_words = min_words;
        self
    }

    #[must_use]
    pub fn min_render_chars(mut self, min_render_chars: usize) -> Self {
        self.min_render_chars = min_render_chars;
        self
    }

    #[must_use]
    pub fn max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn headless_profile(mut self, profile: RenderProfile) -> Self {
        self.headless_profile = profile;
        self
    }

    #[must_use]
    pub fn headful_profile(mut self, profile: RenderProfile) -> Self {
        self.headful_profile = profile;
        self
    }

    #[must_use]
    pub fn enable_headful(mut self, enable: bool) -> Self {
        self.enable_headful = enable;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.chrome_data_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn bot_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bot_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and produce the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a count or timeout is zero or the user agent
    /// is blank.
    pub fn build(self) -> Result<FetchConfig, ConfigError> {
        if self.max_retries == 0 {
            return Err(ConfigError::NotPositive { field: "max_retries" });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::NotPositive { field: "timeout_ms" });
        }
        if self.max_concurrent == 0 {
            return Err(ConfigError::NotPositive { field: "max_concurrent" });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        if self.headless_profile.navigation_timeout.is_zero() {
            return Err(ConfigError::ZeroNavigationTimeout { profile: "headless" });
        }
        if self.headful_profile.navigation_timeout.is_zero() {
            return Err(ConfigError::ZeroNavigationTimeout { profile: "headful" });
        }

        Ok(self.into_config())
    }

    pub(crate) fn into_config(self) -> FetchConfig {
        FetchConfig {
            max_retries: self.max_retries,
            timeout_ms: self.timeout_ms,
            retry_backoff_unit: self.retry_backoff_unit,
            min_words: self.min_words,
            min_render_chars: self.min_render_chars,
            max_concurrent: self.max_concurrent,
            user_agent: self.user_agent,
            headless_profile: self.headless_profile,
            headful_profile: self.headful_profile,
            enable_headful: self.enable_headful,
            chrome_data_dir: self.chrome_data_dir,
            bot_markers: self.bot_markers,
        }
    }
}
