//! Owned browser process for a single render attempt

use chromiumoxide::browser::Browser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tracing::warn;

use super::RenderProfile;
use super::RenderError;
use super::browser_setup::{create_profile_dir, launch_browser};
use super::cleanup::{CleanupResult, cleanup_browser_and_data, remove_profile_dir};
use super::scope::Releasable;

/// Launch/close counters shared by every session a renderer creates
#[derive(Debug, Default)]
pub struct RenderStats {
    launches: AtomicU64,
    closes: AtomicU64,
}

impl RenderStats {
    #[must_use]
    pub fn launches(&self) -> u64 {
        self.launches.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn closes(&self) -> u64 {
        self.closes.load(Ordering::SeqCst)
    }

    /// Sessions launched but not yet torn down
    #[must_use]
    pub fn open(&self) -> u64 {
        self.launches().saturating_sub(self.closes())
    }

    pub(crate) fn record_launch(&self) {
        self.launches.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// A launched browser, its CDP handler and its profile directory
///
/// `close()` tears everything down and waits for the process. Dropping an
/// unclosed session aborts the handler, lets chromiumoxide kill the child and
/// removes the profile directory synchronously.
pub struct BrowserSession {
    browser: Option<Browser>,
    handler: Option<JoinHandle<()>>,
    profile_dir: Option<PathBuf>,
    stats: Arc<RenderStats>,
}

impl BrowserSession {
    /// Launch a browser configured for `profile`
    ///
    /// # Errors
    ///
    /// `RenderError::Launch` if the profile directory cannot be created or
    /// Chrome fails to start. Nothing is left behind on failure.
    pub async fn launch(
        profile: &RenderProfile,
        user_agent: &str,
        data_root: Option<&Path>,
        stats: Arc<RenderStats>,
    ) -> Result<Self, RenderError> {
        let profile_dir =
            create_profile_dir(data_root).map_err(|e| RenderError::Launch(format!("{e:#}")))?;

        match launch_browser(profile, user_agent, &profile_dir).await {
            Ok((browser, handler)) => {
                stats.record_launch();
                Ok(Self {
                    browser: Some(browser),
                    handler: Some(handler),
                    profile_dir: Some(profile_dir),
                    stats,
                })
            }
            Err(e) => {
                remove_profile_dir(&profile_dir);
                Err(RenderError::Launch(format!("{e:#}")))
            }
        }
    }

    /// The live browser
    ///
    /// # Errors
    ///
    /// `RenderError::Page` if the session was already torn down.
    pub fn browser(&self) -> Result<&Browser, RenderError> {
        self.browser
            .as_ref()
            .ok_or_else(|| RenderError::Page("browser session already closed".to_string()))
    }

    #[must_use]
    pub fn profile_dir(&self) -> Option<&Path> {
        self.profile_dir.as_deref()
    }

    /// Tear down the browser and remove its profile directory
    pub async fn close(mut self) -> CleanupResult {
        let (Some(browser), Some(handler), Some(profile_dir)) = (
            self.browser.take(),
            self.handler.take(),
            self.profile_dir.take(),
        ) else {
            return CleanupResult::Success;
        };

        let result = cleanup_browser_and_data(browser, handler, &profile_dir).await;
        self.stats.record_close();
        result
    }
}

impl Releasable for BrowserSession {
    async fn release(self) {
        if let CleanupResult::PartialFailure(errors) = self.close().await {
            warn!("Browser teardown finished with errors: {}", errors.join("; "));
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.browser.is_none() {
            return;
        }

        warn!("BrowserSession dropped without explicit close - killing browser in Drop");
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        // chromiumoxide kills a still-running child when the Browser drops
        drop(self.browser.take());
        if let Some(dir) = self.profile_dir.take() {
            remove_profile_dir(&dir);
        }
        self.stats.record_close();
    }
}
