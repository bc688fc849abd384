//! Chrome discovery and launch
//!
//! Resolution order for the executable: `CHROMIUM_PATH`, well-known install
//! locations for the platform, a `which` lookup, then a managed download into
//! the user cache directory.

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tokio::sync::OnceCell;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use super::RenderProfile;
use crate::utils::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

const CHROMIUM_PATH_ENV: &str = "CHROMIUM_PATH";

/// Launch flags shared by both render levels
const LAUNCH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-notifications",
    "--disable-popup-blocking",
    "--disable-extensions",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-breakpad",
    "--disable-hang-monitor",
    "--disable-prompt-on-repost",
    "--disable-features=TranslateUI",
    "--disable-setuid-sandbox",
    "--no-sandbox",
    "--no-first-run",
    "--no-default-browser-check",
    "--password-store=basic",
    "--use-mock-keychain",
    "--metrics-recording-only",
    "--hide-scrollbars",
    "--mute-audio",
];

fn platform_candidates() -> Vec<PathBuf> {
    let raw: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "~/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "~/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    raw.iter()
        .filter_map(|candidate| match candidate.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(candidate)),
        })
        .collect()
}

fn which_lookup() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        return None;
    }

    ["chromium", "chromium-browser", "google-chrome", "chrome"]
        .iter()
        .find_map(|name| {
            let output = Command::new("which").arg(name).output().ok()?;
            if !output.status.success() {
                return None;
            }
            let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (!found.is_empty()).then(|| PathBuf::from(found))
        })
}

/// Locate an installed Chrome/Chromium executable
pub fn find_browser_executable() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CHROMIUM_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from {}: {}", CHROMIUM_PATH_ENV, path.display());
            return Ok(path);
        }
        warn!(
            "{} points to a missing file: {}",
            CHROMIUM_PATH_ENV,
            path.display()
        );
    }

    if let Some(path) = platform_candidates().into_iter().find(|p| p.exists()) {
        debug!("Found browser at: {}", path.display());
        return Ok(path);
    }

    if let Some(path) = which_lookup() {
        debug!("Found browser on PATH: {}", path.display());
        return Ok(path);
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Executable from the first successful managed download in this process
static MANAGED_BROWSER: OnceCell<PathBuf> = OnceCell::const_new();

/// Run `download` unless `cell` already holds a path
///
/// Concurrent callers wait on the one in-flight download. A failed download
/// leaves `cell` empty so the next caller tries again.
async fn download_once<F, Fut>(cell: &OnceCell<PathBuf>, download: F) -> Result<PathBuf>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<PathBuf>>,
{
    cell.get_or_try_init(download).await.cloned()
}

/// Download a managed Chromium into the user cache directory
///
/// At most one download runs per process; later callers reuse its path.
pub async fn download_managed_browser() -> Result<PathBuf> {
    download_once(&MANAGED_BROWSER, fetch_managed_browser).await
}

async fn fetch_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("kodegen_resilient_fetch")
        .join("chromium");

    info!("Downloading managed Chromium into {}", cache_dir.display());
    std::fs::create_dir_all(&cache_dir).context("Failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );
    let revision = fetcher.fetch().await.context("Failed to fetch browser")?;

    info!("Downloaded Chromium to: {}", revision.folder_path.display());
    Ok(revision.executable_path)
}

/// Installed executable if present, otherwise a managed download
pub async fn resolve_browser_executable() -> Result<PathBuf> {
    match find_browser_executable() {
        Ok(path) => Ok(path),
        Err(e) => {
            warn!("{e}; falling back to managed download");
            download_managed_browser().await
        }
    }
}

/// Create a fresh, uniquely named profile directory for one launch
pub fn create_profile_dir(root: Option<&Path>) -> Result<PathBuf> {
    let root = root.map_or_else(std::env::temp_dir, Path::to_path_buf);
    let dir = root.join(format!("kodegen_fetch_{}", Uuid::new_v4()));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create profile directory {}", dir.display()))?;
    Ok(dir)
}

/// Launch an isolated browser for one render attempt
///
/// Returns the browser and its CDP handler task. The caller owns both, along
/// with `user_data_dir`, and must tear all three down.
pub async fn launch_browser(
    profile: &RenderProfile,
    user_agent: &str,
    user_data_dir: &Path,
) -> Result<(Browser, JoinHandle<()>)> {
    let executable = resolve_browser_executable().await?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(profile.navigation_timeout)
        .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
        .user_data_dir(user_data_dir)
        .chrome_executable(executable);

    builder = if profile.headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    builder = builder.arg(format!("--user-agent={user_agent}"));
    for arg in LAUNCH_ARGS {
        builder = builder.arg(*arg);
    }

    let config = builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    debug!("Launching {} browser", profile.label());
    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let message = e.to_string();
                // chromiumoxide cannot decode some newer CDP events
                if message.contains("data did not match any variant of untagged enum Message")
                    || message.contains("Failed to deserialize WS response")
                {
                    trace!("Ignored CDP decode error: {}", message);
                } else {
                    error!("Browser handler error: {:?}", e);
                }
            }
        }
        trace!("Browser handler task completed");
    });

    Ok((browser, handler_task))
}
