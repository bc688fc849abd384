//! Chromium-backed interactive session

use async_trait::async_trait;
use chromiumoxide::Page;
use std::sync::Arc;
use tracing::{debug, warn};

use super::InteractiveSession;
use crate::extractor::{Extractor, safe_extract};
use crate::render::wait::{wait_for_condition, with_page_timeout};
use crate::render::{BrowserSession, CleanupResult, RenderError, RenderProfile, RenderStats};
use crate::utils::{SESSION_PREVIEW_LIMIT, SESSION_TEXT_LIMIT};

/// A headless page kept open across calls
pub struct ChromiumSession {
    browser: Option<BrowserSession>,
    page: Option<Page>,
    profile: RenderProfile,
    extractor: Arc<dyn Extractor>,
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

impl ChromiumSession {
    /// Launch a browser and open a blank page
    ///
    /// # Errors
    ///
    /// `RenderError::Launch` or `RenderError::Page` if Chrome cannot be started
    /// or the first page cannot be opened.
    pub async fn launch(
        user_agent: &str,
        extractor: Arc<dyn Extractor>,
        stats: Arc<RenderStats>,
    ) -> Result<Self, RenderError> {
        let profile = RenderProfile::headless();
        let browser = BrowserSession::launch(&profile, user_agent, None, stats).await?;

        let opened = browser.browser()?.new_page("about:blank").await;
        let page = match opened {
            Ok(page) => page,
            Err(e) => {
                browser.close().await;
                return Err(RenderError::Page(format!("failed to open page: {e}")));
            }
        };

        Ok(Self {
            browser: Some(browser),
            page: Some(page),
            profile,
            extractor,
        })
    }

    fn page(&self) -> Result<&Page, RenderError> {
        self.page
            .as_ref()
            .ok_or_else(|| RenderError::Page("session is closed".to_string()))
    }

    async fn body_text(page: &Page) -> String {
        match page.find_element("body").await {
            Ok(body) => body.inner_text().await.ok().flatten().unwrap_or_default(),
            Err(_) => String::new(),
        }
    }
}

#[async_trait]
impl InteractiveSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<String, RenderError> {
        let page = self.page()?;
        with_page_timeout(
            async {
                page.goto(url)
                    .await
                    .map_err(|e| RenderError::Navigation(e.to_string()))?;
                wait_for_condition(page, self.profile.wait_condition).await
            },
            self.profile.navigation_timeout,
            "navigation",
        )
        .await?;

        let preview = truncate_chars(&Self::body_text(page).await, SESSION_PREVIEW_LIMIT);
        debug!("Session navigated to {}", url);
        Ok(format!("Navigated to {url}. Preview: {preview}"))
    }

    async fn get_text(&mut self) -> Result<String, RenderError> {
        let page = self.page()?;
        let html = page
            .content()
            .await
            .map_err(|e| RenderError::Page(format!("failed to read markup: {e}")))?;
        let base_url = page.url().await.ok().flatten();

        let text = match safe_extract(self.extractor.as_ref(), &html, base_url.as_deref()) {
            Some(extracted) => extracted,
            None => Self::body_text(page).await,
        };
        Ok(truncate_chars(&text, SESSION_TEXT_LIMIT))
    }

    async fn close(&mut self) -> Result<(), RenderError> {
        if let Some(page) = self.page.take()
            && let Err(e) = page.close().await
        {
            debug!("Page close failed (browser teardown follows): {}", e);
        }

        match self.browser.take() {
            Some(browser) => match browser.close().await {
                CleanupResult::Success => Ok(()),
                CleanupResult::PartialFailure(errors) => {
                    warn!("Session teardown finished with errors: {}", errors.join("; "));
                    Err(RenderError::Page(errors.join("; ")))
                }
            },
            None => Ok(()),
        }
    }
}
