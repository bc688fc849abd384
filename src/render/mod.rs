//! Browser rendering for the two render strategy levels
//!
//! `Renderer` is the seam the engine depends on. `ChromiumRenderer` launches
//! a fresh Chrome per call through `BrowserSession`, whose teardown runs on
//! every exit path.

pub mod browser;
pub mod browser_setup;
pub mod chromium;
pub mod cleanup;
pub mod profile;
pub mod scope;
pub mod wait;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub use browser::{BrowserSession, RenderStats};
pub use chromium::ChromiumRenderer;
pub use cleanup::CleanupResult;
pub use profile::{RenderProfile, WaitCondition};
pub use scope::{Releasable, with_resource};

/// Markup and text read from a rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    /// `innerText` of `<body>`
    pub body_text: String,
    /// URL the page ended on after redirects and scripts
    pub final_url: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("{0}")]
    Timeout(String),

    #[error("page operation failed: {0}")]
    Page(String),

    #[error("{0} rendering disabled")]
    Disabled(&'static str),
}

/// Render a URL in a private, single-use browser
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Launch, navigate, wait, read, tear down. The browser must be released
    /// before this returns, on success and on error.
    async fn render(&self, url: &Url, profile: &RenderProfile) -> Result<RenderedPage, RenderError>;
}
