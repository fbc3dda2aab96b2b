//! Fan-out search over every provider and the merged ranking.

use crate::cancel::CancellationToken;
use crate::error::{SearchError, SearchResult};
use crate::models::{sort_by_score_desc, ProviderResult, Query};
use crate::observability::{MetricsTracker, Timer};
use crate::providers::Provider;
use futures::future::join_all;
use std::sync::{Arc, Mutex};

/// Runs one query pass across all providers and merges their results.
///
/// Providers are kept in priority order. Each provider that accepts the
/// query runs in its own task on the runtime, so a slow provider never
/// stalls a fast one, and a provider that errors or panics contributes
/// nothing while the others still merge.
///
/// Starting a pass cancels the previous one. A cancelled pass returns
/// [`SearchError::Superseded`] instead of a partial list.
pub struct SearchAggregator {
    providers: Vec<Arc<dyn Provider>>,
    max_results: usize,
    metrics: MetricsTracker,
    in_flight: Mutex<Option<CancellationToken>>,
}

impl SearchAggregator {
    pub fn new(
        providers: Vec<Arc<dyn Provider>>,
        max_results: usize,
        metrics: MetricsTracker,
    ) -> Self {
        Self {
            providers,
            max_results,
            metrics,
            in_flight: Mutex::new(None),
        }
    }

    /// Provider ids in priority order.
    pub fn provider_ids(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.id().to_string()).collect()
    }

    /// Run a pass for `query`, superseding any pass still in flight.
    pub async fn search(&self, query: &Query) -> SearchResult<Vec<ProviderResult>> {
        let cancel = self.begin_pass();
        self.search_with_token(query, &cancel).await
    }

    /// Run a pass with a caller-owned token. Does not supersede other passes.
    pub async fn search_with_token(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> SearchResult<Vec<ProviderResult>> {
        let timer = Timer::new("search");

        let mut dispatched = Vec::new();
        for provider in &self.providers {
            if !provider.can_handle(query) {
                tracing::trace!(provider = %provider.id(), "Provider skipped query");
                continue;
            }
            let task_provider = provider.clone();
            let task_query = query.clone();
            let task_cancel = cancel.clone();
            let handle = tokio::spawn(async move {
                task_provider.query(&task_query, &task_cancel).await
            });
            dispatched.push((provider.id().to_string(), handle));
        }

        let (ids, handles): (Vec<_>, Vec<_>) = dispatched.into_iter().unzip();
        let outcomes = join_all(handles).await;

        if cancel.is_cancelled() {
            self.metrics.track_superseded_query();
            return Err(SearchError::Superseded);
        }

        let mut merged = Vec::new();
        for (provider_id, outcome) in ids.iter().zip(outcomes) {
            match outcome {
                Ok(Ok(results)) => {
                    tracing::debug!(provider = %provider_id, count = results.len(), "Provider answered");
                    merged.extend(results);
                }
                Ok(Err(e)) => {
                    tracing::warn!(provider = %provider_id, "Provider failed: {}", e);
                    self.metrics.track_provider_failure(provider_id);
                }
                Err(e) => {
                    tracing::error!(provider = %provider_id, "Provider task aborted: {}", e);
                    self.metrics.track_provider_failure(provider_id);
                }
            }
        }

        // concatenated in priority order, so the stable sort breaks ties by
        // provider priority and then by each provider's own order
        sort_by_score_desc(&mut merged);
        merged.truncate(self.max_results);

        self.metrics.track_search_query(timer.finish(), merged.len());
        Ok(merged)
    }

    /// Cancel the in-flight pass, if any.
    pub fn cancel_in_flight(&self) {
        if let Some(token) = self.lock_in_flight().take() {
            token.cancel();
        }
    }

    /// Start a new pass and cancel the one in flight. The returned token
    /// stays live until a later pass begins.
    pub fn begin_pass(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self.lock_in_flight().replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }
        token
    }

    fn lock_in_flight(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
