//! reqwest-backed transport with a lazily built, reusable client

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use tracing::{debug, trace};
use url::Url;

use super::{HttpResponse, Transport, TransportError};
use crate::utils::{POOL_IDLE_TIMEOUT, POOL_MAX_IDLE_PER_HOST};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

/// HTTP transport sharing one connection pool across every retrieval
///
/// The client is created on first use and dropped by `close()`. A fetch after
/// `close()` builds a fresh client.
pub struct HttpTransport {
    user_agent: String,
    client: Mutex<Option<Client>>,
}

impl HttpTransport {
    #[must_use]
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            client: Mutex::new(None),
        }
    }

    /// True while a pooled client exists
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn client(&self) -> Result<Client, TransportError> {
        let mut guard = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = build_client(&self.user_agent)?;
        debug!("Opened HTTP client pool");
        *guard = Some(client.clone());
        Ok(client)
    }
}

fn build_client(user_agent: &str) -> Result<Client, TransportError> {
    let mut headers = HeaderMap::new();
    let ua = HeaderValue::from_str(user_agent)
        .map_err(|e| TransportError::Request(format!("invalid user agent: {e}")))?;
    headers.insert(USER_AGENT, ua);
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_EN));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    Client::builder()
        .default_headers(headers)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .build()
        .map_err(|e| TransportError::Request(format!("failed to build HTTP client: {e}")))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError> {
        let client = self.client()?;
        trace!("GET {} (timeout {:?})", url, timeout);

        let response = client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Request(format!("failed to read body: {e}")))?;

        Ok(HttpResponse {
            status,
            body,
            headers,
            final_url,
        })
    }

    async fn close(&self) {
        let previous = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            debug!("Closed HTTP client pool");
        }
    }
}
