//! Navigation wait conditions and timeouts

use chromiumoxide::Page;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::{RenderError, WaitCondition};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Resource count must hold steady this long to count as network idle
const NETWORK_QUIET_WINDOW: Duration = Duration::from_millis(500);

const LOAD_STATE_JS: &str = r"
    (function() {
        return {
            readyState: document.readyState,
            resources: performance.getEntriesByType('resource').length
        };
    })()
";

/// Bound a page operation, mapping expiry to `RenderError::Timeout`
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T, RenderError>
where
    F: Future<Output = Result<T, RenderError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(RenderError::Timeout(format!(
            "{operation_name} timed out after {}s",
            timeout.as_secs()
        ))),
    }
}

#[derive(Debug, Clone, Copy)]
struct LoadState {
    ready_state: ReadyState,
    resources: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

async fn load_state(page: &Page) -> Option<LoadState> {
    let value = page
        .evaluate(LOAD_STATE_JS)
        .await
        .ok()?
        .into_value::<serde_json::Value>()
        .ok()?;

    let ready_state = match value.get("readyState").and_then(|v| v.as_str()) {
        Some("complete") => ReadyState::Complete,
        Some("interactive") => ReadyState::Interactive,
        _ => ReadyState::Loading,
    };
    let resources = value
        .get("resources")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);

    Some(LoadState {
        ready_state,
        resources,
    })
}

/// Poll the page until `condition` holds
///
/// Unbounded on its own; callers wrap it in `with_page_timeout`.
pub async fn wait_for_condition(page: &Page, condition: WaitCondition) -> Result<(), RenderError> {
    let start = Instant::now();
    let mut last_resources: Option<u64> = None;
    let mut quiet_since = Instant::now();

    loop {
        if let Some(state) = load_state(page).await {
            trace!("Load state {:?}", state);
            match condition {
                WaitCondition::DomContentLoaded => {
                    if state.ready_state != ReadyState::Loading {
                        debug!("DOM content loaded after {:?}", start.elapsed());
                        return Ok(());
                    }
                }
                WaitCondition::NetworkIdle => {
                    if last_resources != Some(state.resources) {
                        last_resources = Some(state.resources);
                        quiet_since = Instant::now();
                    } else if state.ready_state == ReadyState::Complete
                        && quiet_since.elapsed() >= NETWORK_QUIET_WINDOW
                    {
                        debug!("Network idle after {:?}", start.elapsed());
                        return Ok(());
                    }
                }
            }
        }

        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
