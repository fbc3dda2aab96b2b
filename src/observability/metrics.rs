//! Search and indexing metrics.
//!
//! Counters are cheap atomics shared by cloning the tracker; every update
//! is also emitted as a structured `tracing` event.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Counters for query passes and indexing passes.
#[derive(Debug, Clone, Default)]
pub struct MetricsTracker {
    search_queries_total: Arc<AtomicU64>,
    superseded_queries_total: Arc<AtomicU64>,
    provider_failures_total: Arc<AtomicU64>,
    index_passes_succeeded: Arc<AtomicU64>,
    index_passes_failed: Arc<AtomicU64>,
    index_passes_cancelled: Arc<AtomicU64>,
    documents_indexed_total: Arc<AtomicU64>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a published search pass.
    pub fn track_search_query(&self, duration_ms: u128, result_count: usize) {
        self.search_queries_total.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            duration_ms = duration_ms,
            result_count = result_count,
            "Search query completed"
        );
    }

    /// Track a search pass dropped because a newer one started.
    pub fn track_superseded_query(&self) {
        self.superseded_queries_total.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Search query superseded");
    }

    /// Track a provider that failed or panicked during a pass.
    pub fn track_provider_failure(&self, provider_id: &str) {
        self.provider_failures_total.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(provider = %provider_id, "Provider failure recorded");
    }

    /// Track a flushed batch of documents.
    pub fn track_documents_indexed(&self, count: usize) {
        self.documents_indexed_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Track the end of an indexing pass.
    pub fn track_index_pass(&self, root_id: &str, outcome: PassOutcome, duration_ms: u128) {
        let counter = match outcome {
            PassOutcome::Succeeded => &self.index_passes_succeeded,
            PassOutcome::Failed => &self.index_passes_failed,
            PassOutcome::Cancelled => &self.index_passes_cancelled,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        tracing::info!(
            root_id = %root_id,
            outcome = ?outcome,
            duration_ms = duration_ms,
            "Indexing pass finished"
        );
    }

    pub fn search_queries_total(&self) -> u64 {
        self.search_queries_total.load(Ordering::Relaxed)
    }

    pub fn superseded_queries_total(&self) -> u64 {
        self.superseded_queries_total.load(Ordering::Relaxed)
    }

    pub fn provider_failures_total(&self) -> u64 {
        self.provider_failures_total.load(Ordering::Relaxed)
    }

    pub fn documents_indexed_total(&self) -> u64 {
        self.documents_indexed_total.load(Ordering::Relaxed)
    }

    pub fn index_passes(&self, outcome: PassOutcome) -> u64 {
        match outcome {
            PassOutcome::Succeeded => self.index_passes_succeeded.load(Ordering::Relaxed),
            PassOutcome::Failed => self.index_passes_failed.load(Ordering::Relaxed),
            PassOutcome::Cancelled => self.index_passes_cancelled.load(Ordering::Relaxed),
        }
    }

    /// Human-readable summary of all counters.
    pub fn summary(&self) -> String {
        format!(
            "Metrics Summary:\n\
             Search Queries: {}\n\
             Superseded Queries: {}\n\
             Provider Failures: {}\n\
             Index Passes: {} succeeded, {} failed, {} cancelled\n\
             Documents Indexed: {}",
            self.search_queries_total(),
            self.superseded_queries_total(),
            self.provider_failures_total(),
            self.index_passes(PassOutcome::Succeeded),
            self.index_passes(PassOutcome::Failed),
            self.index_passes(PassOutcome::Cancelled),
            self.documents_indexed_total(),
        )
    }
}

/// How an indexing pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Succeeded,
    Failed,
    Cancelled,
}

/// A timer for tracking operation duration.
pub struct Timer {
    start: Instant,
    operation: String,
}

impl Timer {
    /// Start a new timer for the given operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.into(),
        }
    }

    /// Milliseconds elapsed so far.
    pub fn elapsed_ms(&self) -> u128 {
        self.start.elapsed().as_millis()
    }

    /// Finish the timer and return the elapsed time in milliseconds.
    pub fn finish(self) -> u128 {
        let duration_ms = self.elapsed_ms();

        tracing::debug!(
            operation = %self.operation,
            duration_ms = duration_ms,
            "Operation completed"
        );

        duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_tracker_creation() {
        let tracker = MetricsTracker::new();
        assert_eq!(tracker.search_queries_total(), 0);
        assert_eq!(tracker.provider_failures_total(), 0);
        assert_eq!(tracker.documents_indexed_total(), 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let tracker = MetricsTracker::new();
        let clone = tracker.clone();

        clone.track_search_query(5, 3);
        clone.track_provider_failure("contacts");
        clone.track_documents_indexed(500);
        clone.track_documents_indexed(20);

        assert_eq!(tracker.search_queries_total(), 1);
        assert_eq!(tracker.provider_failures_total(), 1);
        assert_eq!(tracker.documents_indexed_total(), 520);
    }

    #[test]
    fn test_index_pass_outcomes() {
        let tracker = MetricsTracker::new();
        tracker.track_index_pass("docs", PassOutcome::Succeeded, 10);
        tracker.track_index_pass("docs", PassOutcome::Cancelled, 10);
        tracker.track_index_pass("music", PassOutcome::Succeeded, 10);

        assert_eq!(tracker.index_passes(PassOutcome::Succeeded), 2);
        assert_eq!(tracker.index_passes(PassOutcome::Failed), 0);
        assert_eq!(tracker.index_passes(PassOutcome::Cancelled), 1);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::new("test_operation");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(timer.finish() >= 10);
    }

    #[test]
    fn test_summary() {
        let tracker = MetricsTracker::new();
        tracker.track_search_query(1, 1);
        tracker.track_superseded_query();

        let summary = tracker.summary();
        assert!(summary.contains("Search Queries: 1"));
        assert!(summary.contains("Superseded Queries: 1"));
    }
}
