use async_trait::async_trait;
use omnisearch_mcp_server::cancel::CancellationToken;
use omnisearch_mcp_server::error::{ProviderError, ProviderQueryResult};
use omnisearch_mcp_server::models::{ProviderResult, Query, ResultAction};
use omnisearch_mcp_server::providers::Provider;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn result(provider_id: &str, item_id: &str, score: f32) -> ProviderResult {
    ProviderResult::new(
        provider_id,
        item_id,
        format!("{} {}", provider_id, item_id),
        score,
        ResultAction::RunCommand {
            path: format!("/bin/{}", item_id),
        },
    )
}

/// Provider answering every non-blank query with fixed scores.
#[allow(dead_code)]
pub struct StaticProvider {
    id: String,
    items: Vec<(String, f32)>,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl StaticProvider {
    pub fn new(id: &str, items: &[(&str, f32)]) -> Self {
        Self {
            id: id.to_string(),
            items: items
                .iter()
                .map(|(item, score)| (item.to_string(), *score))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for StaticProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn can_handle(&self, query: &Query) -> bool {
        !query.is_blank()
    }

    async fn query(
        &self,
        _query: &Query,
        _cancel: &CancellationToken,
    ) -> ProviderQueryResult<Vec<ProviderResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .items
            .iter()
            .map(|(item, score)| result(&self.id, item, *score))
            .collect())
    }
}

/// Provider whose query always returns an error.
pub struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    fn id(&self) -> &str {
        "failing"
    }

    fn can_handle(&self, _query: &Query) -> bool {
        true
    }

    async fn query(
        &self,
        _query: &Query,
        _cancel: &CancellationToken,
    ) -> ProviderQueryResult<Vec<ProviderResult>> {
        Err(ProviderError::SourceUnavailable("backend offline".to_string()))
    }
}

/// Provider whose query panics.
pub struct PanickingProvider;

#[async_trait]
impl Provider for PanickingProvider {
    fn id(&self) -> &str {
        "panicking"
    }

    fn can_handle(&self, _query: &Query) -> bool {
        true
    }

    async fn query(
        &self,
        _query: &Query,
        _cancel: &CancellationToken,
    ) -> ProviderQueryResult<Vec<ProviderResult>> {
        panic!("provider bug");
    }
}

/// Provider that waits before answering and stops early when cancelled.
#[allow(dead_code)]
pub struct SlowProvider {
    delay: Duration,
}

#[allow(dead_code)]
impl SlowProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Provider for SlowProvider {
    fn id(&self) -> &str {
        "slow"
    }

    fn can_handle(&self, query: &Query) -> bool {
        !query.is_blank()
    }

    async fn query(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> ProviderQueryResult<Vec<ProviderResult>> {
        let step = Duration::from_millis(5);
        let mut waited = Duration::ZERO;
        while waited < self.delay {
            cancel.check()?;
            tokio::time::sleep(step).await;
            waited += step;
        }
        Ok(vec![result("slow", query.trimmed_text(), 1.0)])
    }
}
