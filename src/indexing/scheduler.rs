//! Background indexing passes, at most one per root.

use crate::cancel::CancellationToken;
use crate::domain::IndexRequest;
use crate::error::IndexingResult;
use crate::indexing::{IndexOutcome, IndexingPipeline};
use crate::models::{IndexedRoot, ScanMetadata};
use crate::repositories::{DocumentStore, SettingsStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

struct RunningPass {
    cancel: CancellationToken,
    handle: JoinHandle<IndexOutcome>,
}

impl RunningPass {
    async fn stop(self) -> IndexOutcome {
        self.cancel.cancel();
        join_outcome(self.handle).await
    }
}

async fn join_outcome(handle: JoinHandle<IndexOutcome>) -> IndexOutcome {
    match handle.await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Indexing task aborted: {}", e);
            IndexOutcome::Failure
        }
    }
}

/// Starts indexing passes on background tasks.
///
/// Passes over different roots run concurrently. Triggering a root that
/// already has a pass in flight cancels that pass and waits for it to stop
/// before the new one starts, so a root is never walked twice at once.
pub struct IndexScheduler {
    pipeline: Arc<IndexingPipeline>,
    documents: Arc<dyn DocumentStore>,
    settings: Arc<dyn SettingsStore>,
    passes: Mutex<HashMap<String, RunningPass>>,
}

impl IndexScheduler {
    pub fn new(
        pipeline: Arc<IndexingPipeline>,
        documents: Arc<dyn DocumentStore>,
        settings: Arc<dyn SettingsStore>,
    ) -> Self {
        Self {
            pipeline,
            documents,
            settings,
            passes: Mutex::new(HashMap::new()),
        }
    }

    /// Register a root and start a pass over it.
    ///
    /// Invalid input is rejected before anything is registered or started.
    pub async fn trigger(
        &self,
        root_id: Option<&str>,
        root_uri: Option<&str>,
        display_name: Option<&str>,
    ) -> IndexingResult<IndexRequest> {
        let request = IndexRequest::new(root_id, root_uri, display_name)?;
        self.pipeline.check_root(&request).await?;

        let id = request.root_id.as_str().to_string();
        let root = IndexedRoot {
            uri: request.location.uri().to_string(),
            display_name: request.display_name.clone(),
        };
        let registered_id = id.clone();
        self.settings
            .update(Box::new(move |s| s.with_root(&registered_id, root)))
            .await?;

        let mut passes = self.passes.lock().await;
        if let Some(previous) = passes.remove(&id) {
            tracing::info!(root_id = %id, "Replacing in-flight indexing pass");
            previous.stop().await;
        }

        let cancel = CancellationToken::new();
        let pipeline = self.pipeline.clone();
        let task_request = request.clone();
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move { pipeline.run(&task_request, &task_cancel).await });
        passes.insert(id, RunningPass { cancel, handle });

        Ok(request)
    }

    /// Cancel the root's pass and wait for it to stop.
    ///
    /// Returns the stopped pass's outcome, or `None` if nothing was tracked.
    pub async fn cancel(&self, root_id: &str) -> Option<IndexOutcome> {
        let pass = self.passes.lock().await.remove(root_id)?;
        Some(pass.stop().await)
    }

    /// Wait for the root's current pass to finish.
    pub async fn wait(&self, root_id: &str) -> Option<IndexOutcome> {
        let pass = self.passes.lock().await.remove(root_id)?;
        Some(join_outcome(pass.handle).await)
    }

    /// True while a pass over the root is running.
    pub async fn is_running(&self, root_id: &str) -> bool {
        self.passes
            .lock()
            .await
            .get(root_id)
            .is_some_and(|pass| !pass.handle.is_finished())
    }

    /// Stop any pass, delete the root's documents and forget the root.
    pub async fn remove_root(&self, root_id: &str) -> IndexingResult<usize> {
        self.cancel(root_id).await;
        let removed = self.documents.delete_root(root_id).await?;

        let forgotten = root_id.to_string();
        self.settings
            .update(Box::new(move |s| s.without_root(&forgotten)))
            .await?;

        tracing::info!(root_id = %root_id, count = removed, "Root removed");
        Ok(removed)
    }

    /// Latest scan metadata of one root.
    pub fn status(&self, root_id: &str) -> Option<ScanMetadata> {
        self.settings.current().scan_metadata.get(root_id).cloned()
    }

    /// Cancel every pass; used on shutdown.
    pub async fn shutdown(&self) {
        let passes: Vec<_> = self.passes.lock().await.drain().collect();
        for (root_id, pass) in passes {
            tracing::debug!(root_id = %root_id, "Stopping indexing pass");
            pass.stop().await;
        }
    }
}
