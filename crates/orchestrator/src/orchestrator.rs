// crates/orchestrator/src/orchestrator.rs
//! Orchestrator - batch fan-out and result collection

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn, Instrument};

use crate::progress::ProgressTracker;
use dangle_common::{BatchJob, BatchSummary, ProbeError, ProbeOptions, ProbeResult, Prober};

/// Runs one probe task per hostname and waits for all of them.
///
/// With no concurrency limit (the default) every hostname in a batch is in
/// flight at once; there is no admission control on batch size.
pub struct Orchestrator {
    prober: Arc<dyn Prober>,
    max_concurrency: Option<usize>,
}

impl Orchestrator {
    /// Create an orchestrator around a shared prober, with unbounded fan-out.
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self {
            prober,
            max_concurrency: None,
        }
    }

    /// Create an orchestrator honouring `options.max_concurrency`.
    pub fn from_options(prober: Arc<dyn Prober>, options: &ProbeOptions) -> Self {
        Self::new(prober).with_max_concurrency(options.max_concurrency)
    }

    /// Cap the number of probes in flight per batch. `None` removes the cap.
    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.map(|n| n.max(1));
        self
    }

    /// Check a list of hostnames. One result per input element, in input
    /// order, duplicates included.
    pub async fn check_subdomains(&self, subdomains: Vec<String>) -> Vec<ProbeResult> {
        self.run(BatchJob::new(subdomains)).await.0
    }

    /// Run a batch to completion and return its results with a summary.
    #[instrument(skip_all, fields(batch = %job.id, subdomains = job.len()))]
    pub async fn run(&self, job: BatchJob) -> (Vec<ProbeResult>, BatchSummary) {
        let started = Instant::now();
        info!(prober = self.prober.name(), "Starting batch {} subdomains={}", job.id, job.len());

        let progress = Arc::new(ProgressTracker::new(job.len()));
        let limiter = self.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));

        let handles: Vec<JoinHandle<ProbeResult>> = job
            .subdomains
            .iter()
            .cloned()
            .map(|subdomain| {
                let prober = Arc::clone(&self.prober);
                let progress = Arc::clone(&progress);
                let limiter = limiter.clone();

                tokio::spawn(
                    async move {
                        // The semaphore is never closed, so acquire only fails
                        // if it were; run unbounded in that case.
                        let _permit = match limiter {
                            Some(sem) => sem.acquire_owned().await.ok(),
                            None => None,
                        };
                        let result = prober.probe(&subdomain).await;
                        progress.record(&result);
                        result
                    }
                    .in_current_span(),
                )
            })
            .collect();

        // Await in spawn order: completion order is irrelevant, results come
        // back aligned with the input.
        let mut results = Vec::with_capacity(handles.len());
        for (handle, subdomain) in handles.into_iter().zip(job.subdomains.iter()) {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!(subdomain = %subdomain, error = %e, "probe task did not complete");
                    let result = ProbeResult::new(subdomain.as_str())
                        .with_error(ProbeError::TaskFailed(e.to_string()));
                    progress.record(&result);
                    results.push(result);
                }
            }
        }

        let summary = progress.summary(started.elapsed());
        progress.log_summary(&summary);
        (results, summary)
    }
}
