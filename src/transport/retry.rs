//! Linear-backoff retry policy over a `Transport`

use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use super::{HttpResponse, Transport, TransportError};
use crate::config::FetchConfig;

/// Attempt count, per-attempt timeout and backoff unit for one retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub timeout: Duration,
    pub backoff_unit: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_retries: config.max_retries(),
            timeout: config.timeout(),
            backoff_unit: config.retry_backoff_unit(),
        }
    }

    /// Same backoff unit, with a retrieval's own attempt count and timeout
    #[must_use]
    pub fn with_limits(self, max_retries: u32, timeout: Duration) -> Self {
        Self {
            max_retries,
            timeout,
            ..self
        }
    }

    /// Sleep after failed attempt `attempt` (zero-based)
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        self.backoff_unit.saturating_mul(attempt + 1)
    }
}

/// GET `url` until a 2xx response with a non-empty body arrives
///
/// Makes at most `max_retries` attempts (minimum one). Non-2xx statuses, empty
/// bodies and request failures are all retried, sleeping
/// `(i + 1) * backoff_unit` after failed attempt `i`; nothing is slept after
/// the last attempt. The error from the final attempt is returned.
///
/// # Errors
///
/// - `TransportError::Status` if the last attempt got a non-2xx status
/// - `TransportError::Request` if the last attempt failed to get a response
/// - `TransportError::EmptyBody` if the last attempt got an empty 2xx body
pub async fn fetch_with_retry(
    transport: &dyn Transport,
    url: &Url,
    policy: &RetryPolicy,
) -> Result<HttpResponse, TransportError> {
    let attempts = policy.max_retries.max(1);
    let mut last_error = TransportError::Request("no attempt made".to_string());

    for attempt in 0..attempts {
        match transport.fetch(url, policy.timeout).await {
            Ok(response) if response.is_success() && !response.body.trim().is_empty() => {
                debug!(
                    "Fetched {} on attempt {}/{} ({} bytes)",
                    url,
                    attempt + 1,
                    attempts,
                    response.body.len()
                );
                return Ok(response);
            }
            Ok(response) if response.is_success() => {
                last_error = TransportError::EmptyBody {
                    attempts: attempt + 1,
                };
            }
            Ok(response) => {
                last_error = TransportError::Status {
                    status: response.status,
                    url: url.to_string(),
                };
            }
            Err(e) => last_error = e,
        }

        if attempt + 1 < attempts {
            let delay = policy.backoff_after(attempt);
            warn!(
                "Attempt {}/{} for {} failed: {}; retrying in {:?}",
                attempt + 1,
                attempts,
                url,
                last_error,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }

    warn!("Giving up on {} after {} attempts: {}", url, attempts, last_error);
    Err(last_error)
}
