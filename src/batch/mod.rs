//! Bounded-concurrency batch driver
//!
//! Retrievals are admitted through a FIFO semaphore in input order, each runs
//! on its own task, and results are collected as they finish. A retrieval
//! whose task panics is left out of `results` and listed in `dropped`.

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::engine::{FallbackEngine, RetrievalResult, SessionScope};

/// A retrieval that ended without a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedRetrieval {
    pub url: String,
    pub reason: String,
}

/// Everything a batch produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One entry per completed retrieval, in input order
    pub results: Vec<RetrievalResult>,
    pub dropped: Vec<DroppedRetrieval>,
}

impl BatchReport {
    #[must_use]
    pub fn successes(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }
}

/// Retrieve every URL, at most `max_concurrent` at a time
///
/// Returns only the completed retrievals; see `run_batch_report` for the
/// dropped ones.
pub async fn run_batch(
    engine: &FallbackEngine,
    urls: &[String],
    max_concurrent: usize,
) -> Vec<RetrievalResult> {
    run_batch_report(engine, urls, max_concurrent).await.results
}

/// Retrieve every URL, at most `max_concurrent` at a time, reporting panics
///
/// `max_concurrent` below 1 is treated as 1. The engine's transport is shared
/// by all retrievals and closed exactly once after the last one settles.
pub async fn run_batch_report(
    engine: &FallbackEngine,
    urls: &[String],
    max_concurrent: usize,
) -> BatchReport {
    let concurrency = max_concurrent.max(1);
    let engine = engine.clone().with_scope(SessionScope::Shared);
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut active_tasks = FuturesUnordered::new();

    info!("Starting batch of {} URLs (max {} concurrent)", urls.len(), concurrency);

    for (index, url) in urls.iter().enumerate() {
        let permit = if let Ok(p) = Arc::clone(&semaphore).acquire_owned().await {
            p
        } else {
            error!("Admission semaphore closed unexpectedly");
            break;
        };

        let task_engine = engine.clone();
        let task_url = url.clone();
        let handle = tokio::spawn(async move {
            let _permit = permit; // Held until the retrieval settles
            task_engine.fetch_url(&task_url).await
        });

        let url = url.clone();
        active_tasks.push(async move { (index, url, handle.await) });
    }

    let mut completed = Vec::with_capacity(urls.len());
    let mut dropped = Vec::new();

    while let Some((index, url, joined)) = active_tasks.next().await {
        match joined {
            Ok(result) => {
                debug!("Completed {} ({:?})", url, result.strategy_used);
                completed.push((index, result));
            }
            Err(e) => {
                error!("Retrieval task for {} failed: {}", url, e);
                dropped.push(DroppedRetrieval {
                    url,
                    reason: e.to_string(),
                });
            }
        }
    }

    engine.transport().close().await;

    completed.sort_by_key(|(index, _)| *index);
    let report = BatchReport {
        results: completed.into_iter().map(|(_, result)| result).collect(),
        dropped,
    };

    info!(
        "Batch finished: {} succeeded, {} failed, {} dropped",
        report.successes(),
        report.results.len() - report.successes(),
        report.dropped.len()
    );
    report
}
