//! HTTP transport for the two HTTP strategy levels
//!
//! The engine talks to the network through the `Transport` trait so tests can
//! substitute scripted responses. `HttpTransport` is the reqwest-backed
//! implementation; `fetch_with_retry` applies the linear-backoff policy on top
//! of any transport.

pub mod http;
pub mod retry;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

pub use http::HttpTransport;
pub use retry::{RetryPolicy, fetch_with_retry};

/// A completed HTTP exchange, whatever its status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    /// Response headers, lowercase names, in arrival order
    pub headers: Vec<(String, String)>,
    /// URL after redirects
    pub final_url: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Terminal transport failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Non-2xx status on the final attempt
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Connection, TLS, timeout or body read failure on the final attempt
    #[error("request failed: {0}")]
    Request(String),

    /// Every attempt returned a successful but empty body
    #[error("empty response body after {attempts} attempts")]
    EmptyBody { attempts: u32 },
}

/// One GET with a per-call timeout
///
/// Implementations must be shareable across tasks; the batch runner hands a
/// single transport to every retrieval and closes it once at the end.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one GET. Any received status is `Ok`; only failures to obtain
    /// a response are `Err`.
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<HttpResponse, TransportError>;

    /// Release pooled connections. Idempotent; a later `fetch` may reopen.
    async fn close(&self);
}
