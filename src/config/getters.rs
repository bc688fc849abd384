//! Read accessors for `FetchConfig`

use std::path::PathBuf;
use std::time::Duration;

use super::types::FetchConfig;
use crate::engine::StrategyName;
use crate::render::RenderProfile;

impl FetchConfig {
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Per-attempt HTTP timeout as a `Duration`
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[must_use]
    pub fn retry_backoff_unit(&self) -> Duration {
        self.retry_backoff_unit
    }

    #[must_use]
    pub fn min_words(&self) -> usize {
        self.min_words
    }

    #[must_use]
    pub fn min_render_chars(&self) -> usize {
        self.min_render_chars
    }

    #[must_use]
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn headless_profile(&self) -> &RenderProfile {
        &self.headless_profile
    }

    #[must_use]
    pub fn headful_profile(&self) -> &RenderProfile {
        &self.headful_profile
    }

    #[must_use]
    pub fn enable_headful(&self) -> bool {
        self.enable_headful
    }

    #[must_use]
    pub fn chrome_data_dir(&self) -> Option<&PathBuf> {
        self.chrome_data_dir.as_ref()
    }

    #[must_use]
    pub fn bot_markers(&self) -> &[String] {
        &self.bot_markers
    }

    /// Browser profile for a render level, `None` for the HTTP levels
    #[must_use]
    pub fn profile_for(&self, strategy: StrategyName) -> Option<&RenderProfile> {
        match strategy {
            StrategyName::HeadlessRender => Some(&self.headless_profile),
            StrategyName::HeadfulRender => Some(&self.headful_profile),
            StrategyName::Plain | StrategyName::Structured => None,
        }
    }
}
