use async_trait::async_trait;
use omnisearch_mcp_server::cancel::CancellationToken;
use omnisearch_mcp_server::error::{StoreError, StoreResult};
use omnisearch_mcp_server::models::IndexedDocument;
use omnisearch_mcp_server::repositories::{DocumentStore, InMemoryDocumentStore};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock document store for testing.
///
/// Delegates to an [`InMemoryDocumentStore`], records every batch size and
/// call, and can be told to fail or to cancel a token after a number of
/// batches.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockDocumentStore {
    inner: Arc<InMemoryDocumentStore>,
    batch_sizes: Arc<Mutex<Vec<usize>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    fail_after_batches: Arc<Mutex<Option<usize>>>,
    cancel_after_batches: Arc<Mutex<Option<(usize, CancellationToken)>>>,
    insert_delay: Arc<Mutex<Option<Duration>>>,
}

#[allow(dead_code)]
impl MockDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every insert once `batches` inserts have succeeded.
    pub fn fail_after(&self, batches: usize) {
        *self.fail_after_batches.lock().unwrap() = Some(batches);
    }

    /// Cancel `token` right after the `batches`-th insert completes.
    pub fn cancel_after(&self, batches: usize, token: CancellationToken) {
        *self.cancel_after_batches.lock().unwrap() = Some((batches, token));
    }

    /// Sleep for `delay` before every insert.
    pub fn slow_inserts(&self, delay: Duration) {
        *self.insert_delay.lock().unwrap() = Some(delay);
    }

    /// Sizes of the batches inserted so far, in order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn insert_batch(&self, documents: Vec<IndexedDocument>) -> StoreResult<()> {
        self.track_call("insert_batch");

        let delay = *self.insert_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let done = self.batch_sizes.lock().unwrap().len();
        if let Some(limit) = *self.fail_after_batches.lock().unwrap() {
            if done >= limit {
                return Err(StoreError::Unavailable("disk full".to_string()));
            }
        }

        let size = documents.len();
        self.inner.insert_batch(documents).await?;
        self.batch_sizes.lock().unwrap().push(size);

        if let Some((limit, token)) = self.cancel_after_batches.lock().unwrap().as_ref() {
            if done + 1 >= *limit {
                token.cancel();
            }
        }
        Ok(())
    }

    async fn delete_root(&self, root_id: &str) -> StoreResult<usize> {
        self.track_call("delete_root");
        self.inner.delete_root(root_id).await
    }

    async fn documents(&self) -> StoreResult<Vec<IndexedDocument>> {
        self.track_call("documents");
        self.inner.documents().await
    }

    async fn count_for_root(&self, root_id: &str) -> StoreResult<usize> {
        self.inner.count_for_root(root_id).await
    }
}
