//! Chromium-backed `Renderer`

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use super::browser::{BrowserSession, RenderStats};
use super::scope::with_resource;
use super::wait::{wait_for_condition, with_page_timeout};
use super::{RenderError, RenderProfile, RenderedPage, Renderer};
use crate::config::FetchConfig;
use crate::utils::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

/// Launches one isolated Chrome per `render` call and always tears it down
pub struct ChromiumRenderer {
    user_agent: String,
    chrome_data_dir: Option<PathBuf>,
    stats: Arc<RenderStats>,
}

impl ChromiumRenderer {
    #[must_use]
    pub fn new(user_agent: impl Into<String>, chrome_data_dir: Option<PathBuf>) -> Self {
        Self {
            user_agent: user_agent.into(),
            chrome_data_dir,
            stats: Arc::new(RenderStats::default()),
        }
    }

    #[must_use]
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(config.user_agent(), config.chrome_data_dir().cloned())
    }

    /// Launch/close counters across every render this instance performed
    #[must_use]
    pub fn stats(&self) -> Arc<RenderStats> {
        Arc::clone(&self.stats)
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, url: &Url, profile: &RenderProfile) -> Result<RenderedPage, RenderError> {
        let session = BrowserSession::launch(
            profile,
            &self.user_agent,
            self.chrome_data_dir.as_deref(),
            self.stats(),
        )
        .await?;

        let url = url.clone();
        let profile = profile.clone();
        let user_agent = self.user_agent.clone();

        with_resource(session, move |session| {
            Box::pin(async move {
                let page = session
                    .browser()?
                    .new_page("about:blank")
                    .await
                    .map_err(|e| RenderError::Page(format!("failed to open page: {e}")))?;

                let rendered = render_page(&page, &url, &profile, &user_agent).await;

                if let Err(e) = page.close().await {
                    debug!("Page close failed (browser teardown follows): {}", e);
                }
                rendered
            })
        })
        .await
    }
}

async fn configure_page(page: &Page, user_agent: &str) -> Result<(), RenderError> {
    let metrics = SetDeviceMetricsOverrideParams::builder()
        .width(i64::from(VIEWPORT_WIDTH))
        .height(i64::from(VIEWPORT_HEIGHT))
        .device_scale_factor(1.0)
        .mobile(false)
        .build()
        .map_err(RenderError::Page)?;
    page.execute(metrics)
        .await
        .map_err(|e| RenderError::Page(format!("failed to set viewport: {e}")))?;

    page.execute(SetUserAgentOverrideParams {
        user_agent: user_agent.to_string(),
        accept_language: Some("en-US,en;q=0.5".to_string()),
        platform: None,
        user_agent_metadata: None,
    })
    .await
    .map_err(|e| RenderError::Page(format!("failed to set user agent: {e}")))?;

    Ok(())
}

async fn render_page(
    page: &Page,
    url: &Url,
    profile: &RenderProfile,
    user_agent: &str,
) -> Result<RenderedPage, RenderError> {
    configure_page(page, user_agent).await?;
    profile.pause().await;

    info!("Navigating {} browser to {}", profile.label(), url);
    with_page_timeout(
        async {
            page.goto(url.as_str())
                .await
                .map_err(|e| RenderError::Navigation(e.to_string()))?;
            wait_for_condition(page, profile.wait_condition).await
        },
        profile.navigation_timeout,
        "navigation",
    )
    .await?;

    profile.pause().await;
    tokio::time::sleep(profile.settle_delay).await;

    let html = page
        .content()
        .await
        .map_err(|e| RenderError::Page(format!("failed to read markup: {e}")))?;

    let final_url = page
        .url()
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| url.to_string());

    let body_text = match page.find_element("body").await {
        Ok(body) => body.inner_text().await.ok().flatten().unwrap_or_default(),
        Err(_) => String::new(),
    };

    profile.pause().await;
    debug!(
        "Rendered {} ({} bytes markup, {} chars text)",
        final_url,
        html.len(),
        body_text.len()
    );

    Ok(RenderedPage {
        html,
        body_text,
        final_url,
    })
}
