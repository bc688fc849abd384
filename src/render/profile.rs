//! Per-level browser configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Load condition awaited after navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitCondition {
    /// `document.readyState` is `interactive` or `complete`
    DomContentLoaded,
    /// `document.readyState` is `complete` and the resource count has not
    /// changed for the quiet window
    NetworkIdle,
}

/// How one render level launches and drives the browser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderProfile {
    pub headless: bool,
    pub wait_condition: WaitCondition,
    pub navigation_timeout: Duration,
    pub settle_delay: Duration,
    /// Pause inserted between automation steps; zero disables it
    pub slow_mo: Duration,
}

impl RenderProfile {
    /// Level 3: non-interactive, DOM-content-loaded, 30s navigation, 2s settle
    #[must_use]
    pub fn headless() -> Self {
        Self {
            headless: true,
            wait_condition: WaitCondition::DomContentLoaded,
            navigation_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_secs(2),
            slow_mo: Duration::ZERO,
        }
    }

    /// Level 4: visible window, network-idle, 60s navigation, 5s settle,
    /// 500ms between steps
    #[must_use]
    pub fn headful() -> Self {
        Self {
            headless: false,
            wait_condition: WaitCondition::NetworkIdle,
            navigation_timeout: Duration::from_secs(60),
            settle_delay: Duration::from_secs(5),
            slow_mo: Duration::from_millis(500),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.headless { "headless" } else { "headful" }
    }

    /// Sleep for the slow-motion pause, if any
    pub(crate) async fn pause(&self) {
        if !self.slow_mo.is_zero() {
            tokio::time::sleep(self.slow_mo).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_profiles_match_table() {
        let headless = RenderProfile::headless();
        assert!(headless.headless);
        assert_eq!(headless.wait_condition, WaitCondition::DomContentLoaded);
        assert_eq!(headless.navigation_timeout, Duration::from_secs(30));
        assert_eq!(headless.settle_delay, Duration::from_secs(2));

        let headful = RenderProfile::headful();
        assert!(!headful.headless);
        assert_eq!(headful.wait_condition, WaitCondition::NetworkIdle);
        assert_eq!(headful.navigation_timeout, Duration::from_secs(60));
        assert_eq!(headful.settle_delay, Duration::from_secs(5));
        assert_eq!(headful.slow_mo, Duration::from_millis(500));
    }
}
