//! Progress tracking

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

use dangle_common::{BatchSummary, ProbeResult};

/// Per-batch tally, updated from every probe task.
pub struct ProgressTracker {
    expected: usize,
    tally: Mutex<BatchSummary>,
}

impl ProgressTracker {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            tally: Mutex::new(BatchSummary::default()),
        }
    }

    pub fn record(&self, result: &ProbeResult) {
        let mut tally = self.tally.lock().unwrap_or_else(PoisonError::into_inner);
        tally.update(result);
        debug!(
            subdomain = %result.subdomain,
            "progress {}/{}",
            tally.total,
            self.expected
        );
    }

    /// Results recorded so far.
    pub fn completed(&self) -> usize {
        self.tally
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .total
    }

    pub fn summary(&self, elapsed: Duration) -> BatchSummary {
        let mut summary = self
            .tally
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        summary.elapsed = elapsed;
        summary
    }

    pub fn log_summary(&self, summary: &BatchSummary) {
        info!("Batch Summary:");
        info!("  Total subdomains: {}", self.expected);
        info!("  Completed: {}", summary.total);
        info!("  Vulnerable: {}", summary.vulnerable);
        info!("  With errors: {}", summary.errored);
        info!(
            "  Elapsed: {:.2}s ({:.1}/s)",
            summary.elapsed.as_secs_f64(),
            summary.rate()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dangle_common::ProbeError;

    #[test]
    fn counts_outcomes() {
        let tracker = ProgressTracker::new(3);
        tracker.record(&ProbeResult::new("a").with_service("GitHub"));
        tracker.record(
            &ProbeResult::new("b").with_error(ProbeError::DnsLookupFailed("nxdomain".into())),
        );
        assert_eq!(tracker.completed(), 2);
        tracker.record(&ProbeResult::new("c"));

        assert_eq!(tracker.completed(), 3);
        let summary = tracker.summary(Duration::from_millis(500));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.vulnerable, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.elapsed, Duration::from_millis(500));
        assert_eq!(summary.rate(), 6.0);
    }
}
