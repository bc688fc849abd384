//! Browser teardown
//!
//! Teardown faults are logged and collected; they never stop the remaining
//! steps from running.

use chromiumoxide::Browser;
use log::{debug, warn};
use std::path::Path;
use tokio::task::JoinHandle;

/// Result of a teardown sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupResult {
    /// Every step succeeded
    Success,
    /// Some steps failed, with error details
    PartialFailure(Vec<String>),
}

impl CleanupResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Close the browser, wait for its process, stop the handler, remove the profile
pub async fn cleanup_browser_and_data(
    mut browser: Browser,
    handler: JoinHandle<()>,
    profile_dir: &Path,
) -> CleanupResult {
    let mut errors = Vec::new();

    debug!(target: "resilient_fetch::cleanup", "Closing browser");
    if let Err(e) = browser.close().await {
        warn!(target: "resilient_fetch::cleanup", "Failed to close browser: {e}");
        errors.push(format!("Browser close failed: {e}"));
        // The process may still be alive; make sure it is not left behind
        if let Some(Err(kill_err)) = browser.kill().await {
            warn!(target: "resilient_fetch::cleanup", "Failed to kill browser: {kill_err}");
            errors.push(format!("Browser kill failed: {kill_err}"));
        }
    }

    debug!(target: "resilient_fetch::cleanup", "Waiting for browser process to exit");
    if let Err(e) = browser.wait().await {
        warn!(target: "resilient_fetch::cleanup", "Failed to wait for browser exit: {e}");
        errors.push(format!("Browser wait failed: {e}"));
    }

    handler.abort();

    errors.extend(remove_profile_dir(profile_dir));

    if errors.is_empty() {
        debug!(target: "resilient_fetch::cleanup", "Browser teardown complete");
        CleanupResult::Success
    } else {
        CleanupResult::PartialFailure(errors)
    }
}

/// Remove a profile directory; a directory that is already gone is not an error
pub fn remove_profile_dir(profile_dir: &Path) -> Option<String> {
    match std::fs::remove_dir_all(profile_dir) {
        Ok(()) => None,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(
                target: "resilient_fetch::cleanup",
                "Failed to remove profile directory {}: {e}",
                profile_dir.display()
            );
            Some(format!("Directory cleanup failed: {e}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_profile_dir_is_not_an_error() {
        let dir = std::env::temp_dir().join(format!("kodegen_fetch_missing_{}", uuid::Uuid::new_v4()));
        assert!(remove_profile_dir(&dir).is_none());
    }

    #[test]
    fn test_profile_dir_removed() {
        let dir = std::env::temp_dir().join(format!("kodegen_fetch_rm_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(dir.join("Default")).expect("create dir");
        assert!(remove_profile_dir(&dir).is_none());
        assert!(!dir.exists());
    }
}
