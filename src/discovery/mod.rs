//! Composition of query-based URL discovery with batch retrieval
//!
//! Search engines are external; they plug in through `UrlDiscovery`. Their
//! output is untrusted and is sanitized before anything is fetched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::batch::{BatchReport, run_batch_report};
use crate::engine::FallbackEngine;
use crate::utils::sanitize_candidate_urls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStatus {
    Success,
    Partial,
    NoResults,
    Error,
}

/// Candidate URLs returned for a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    pub urls: Vec<String>,
    pub status: DiscoveryStatus,
}

/// Query → candidate URLs
#[async_trait]
pub trait UrlDiscovery: Send + Sync {
    async fn search(&self, query: &str, num_results: usize) -> DiscoveryResult;
}

/// Discover URLs for `query`, then retrieve up to `num_results` of them
///
/// Relative, duplicate and malformed candidates are removed first. A failed
/// or empty discovery yields an empty report.
pub async fn discover_and_fetch(
    discovery: &dyn UrlDiscovery,
    query: &str,
    num_results: usize,
    engine: &FallbackEngine,
    max_concurrent: usize,
) -> BatchReport {
    let found = discovery.search(query, num_results).await;
    if found.status == DiscoveryStatus::Error {
        warn!("Discovery failed for query '{}'", query);
        return BatchReport::default();
    }

    let mut urls = sanitize_candidate_urls(&found.urls, None);
    urls.truncate(num_results);

    if urls.is_empty() {
        info!("Discovery returned no usable URLs for '{}'", query);
        return BatchReport::default();
    }

    info!(
        "Discovery returned {} candidates for '{}', fetching {}",
        found.urls.len(),
        query,
        urls.len()
    );
    run_batch_report(engine, &urls, max_concurrent).await
}
