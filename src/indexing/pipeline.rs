//! One indexing pass over a root directory.
//!
//! A pass moves the root's scan state `INDEXING -> SUCCESS | ERROR`. It
//! clears the root's previous documents before writing anything, walks the
//! tree depth-first with an explicit stack of directory paths, flushes
//! documents in batches of [`INDEX_BATCH_SIZE`] and stops discovering
//! entries at [`MAX_INDEXED_ITEMS`].
//!
//! The pipeline does not prevent two passes over the same root from
//! overlapping; [`super::IndexScheduler`] does.

use crate::cancel::CancellationToken;
use crate::domain::{IndexRequest, ValidationError};
use crate::error::{IndexingError, IndexingResult};
use crate::indexing::BatchBuffer;
use crate::models::{IndexedDocument, ScanMetadata};
use crate::observability::{MetricsTracker, PassOutcome, Timer};
use crate::repositories::{DocumentStore, SettingsStore};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, ReadDir};

/// Documents buffered before one bulk insert.
pub const INDEX_BATCH_SIZE: usize = 500;

/// Entries discovered per pass before the walk stops.
pub const MAX_INDEXED_ITEMS: usize = 20_000;

/// MIME type recorded for directories.
pub const DIRECTORY_MIME_TYPE: &str = "inode/directory";

/// What a pass reports to its trigger. Error details live in the root's
/// scan metadata, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOutcome {
    Success { indexed_count: u64 },
    Failure,
    Cancelled,
}

/// Runs indexing passes against a document store and the settings record.
pub struct IndexingPipeline {
    documents: Arc<dyn DocumentStore>,
    settings: Arc<dyn SettingsStore>,
    metrics: MetricsTracker,
    batch_size: usize,
    max_items: usize,
}

impl IndexingPipeline {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        settings: Arc<dyn SettingsStore>,
        metrics: MetricsTracker,
    ) -> Self {
        Self::with_limits(
            documents,
            settings,
            metrics,
            INDEX_BATCH_SIZE,
            MAX_INDEXED_ITEMS,
        )
    }

    /// Create a pipeline with a non-default batch size and item cap.
    pub fn with_limits(
        documents: Arc<dyn DocumentStore>,
        settings: Arc<dyn SettingsStore>,
        metrics: MetricsTracker,
        batch_size: usize,
        max_items: usize,
    ) -> Self {
        Self {
            documents,
            settings,
            metrics,
            batch_size,
            max_items,
        }
    }

    /// Validate raw trigger input and run a pass.
    ///
    /// Blank or unresolvable input fails immediately and mutates nothing.
    pub async fn run_job(
        &self,
        root_id: Option<&str>,
        root_uri: Option<&str>,
        display_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> IndexOutcome {
        match IndexRequest::new(root_id, root_uri, display_name) {
            Ok(request) => self.run(&request, cancel).await,
            Err(e) => {
                tracing::warn!("Rejected indexing trigger: {}", e);
                IndexOutcome::Failure
            }
        }
    }

    /// Run a pass for a validated request and map the result to an outcome.
    pub async fn run(&self, request: &IndexRequest, cancel: &CancellationToken) -> IndexOutcome {
        match self.index(request, cancel).await {
            Ok(indexed_count) => IndexOutcome::Success { indexed_count },
            Err(IndexingError::Cancelled) => IndexOutcome::Cancelled,
            Err(_) => IndexOutcome::Failure,
        }
    }

    /// Check that the root resolves to an existing directory.
    pub async fn check_root(&self, request: &IndexRequest) -> IndexingResult<()> {
        let path = request.location.path();
        let metadata = fs::metadata(path).await.map_err(|e| {
            tracing::debug!(path = %path.display(), "Root not accessible: {}", e);
            ValidationError::RootNotFound(path.display().to_string())
        })?;
        if !metadata.is_dir() {
            return Err(ValidationError::NotADirectory(path.display().to_string()).into());
        }
        Ok(())
    }

    /// Run a pass, returning the number of documents indexed.
    pub async fn index(
        &self,
        request: &IndexRequest,
        cancel: &CancellationToken,
    ) -> IndexingResult<u64> {
        self.check_root(request).await?;

        let root_id = request.root_id.as_str();
        let timer = Timer::new("index_root");
        tracing::info!(root_id = %root_id, uri = %request.location.uri(), "Indexing pass started");

        let mut walk = Walk::new(self, request);
        let result = match walk.run(cancel).await {
            Ok(total) => self
                .publish(root_id, ScanMetadata::success(total))
                .await
                .map(|()| total),
            Err(e) => Err(e),
        };
        let duration_ms = timer.finish();

        match result {
            Ok(total) => {
                self.metrics
                    .track_index_pass(root_id, PassOutcome::Succeeded, duration_ms);
                Ok(total)
            }
            Err(IndexingError::Cancelled) => {
                tracing::info!(root_id = %root_id, count = walk.flushed, "Indexing pass cancelled");
                self.metrics
                    .track_index_pass(root_id, PassOutcome::Cancelled, duration_ms);
                Err(IndexingError::Cancelled)
            }
            Err(e) => {
                tracing::error!(root_id = %root_id, "Indexing pass failed: {}", e);
                let metadata = ScanMetadata::error(walk.flushed, e.to_string());
                if let Err(store_err) = self.publish(root_id, metadata).await {
                    tracing::error!(root_id = %root_id, "Failed to record scan error: {}", store_err);
                }
                self.metrics
                    .track_index_pass(root_id, PassOutcome::Failed, duration_ms);
                Err(e)
            }
        }
    }

    async fn publish(&self, root_id: &str, metadata: ScanMetadata) -> IndexingResult<()> {
        let root_id = root_id.to_string();
        self.settings
            .update(Box::new(move |s| s.with_scan_metadata(&root_id, metadata)))
            .await?;
        Ok(())
    }
}

/// State of one walk: the pending batch and how much has been written.
struct Walk<'a> {
    pipeline: &'a IndexingPipeline,
    request: &'a IndexRequest,
    buffer: BatchBuffer<IndexedDocument>,
    discovered: usize,
    flushed: u64,
}

impl<'a> Walk<'a> {
    fn new(pipeline: &'a IndexingPipeline, request: &'a IndexRequest) -> Self {
        Self {
            pipeline,
            request,
            buffer: BatchBuffer::new(pipeline.batch_size),
            discovered: 0,
            flushed: 0,
        }
    }

    async fn run(&mut self, cancel: &CancellationToken) -> IndexingResult<u64> {
        let request = self.request;
        let root_id = request.root_id.as_str();
        self.pipeline
            .publish(root_id, ScanMetadata::indexing(0))
            .await?;
        let removed = self.pipeline.documents.delete_root(root_id).await?;
        tracing::debug!(root_id = %root_id, count = removed, "Cleared previous documents");

        // Directories waiting to be read, as (absolute path, relative path).
        // Each directory is read to the end before the next one is opened, so
        // at most one handle is open however deep the tree is.
        let root = request.location.path();
        let mut stack: Vec<(PathBuf, String)> = vec![(root.to_path_buf(), String::new())];

        'walk: while let Some((dir_path, parent)) = stack.pop() {
            cancel.check()?;
            let mut dir = open_dir(&dir_path).await?;
            let mut subdirs = Vec::new();

            loop {
                cancel.check()?;
                if self.discovered >= self.pipeline.max_items {
                    tracing::info!(root_id = %root_id, count = self.discovered, "Item cap reached");
                    break 'walk;
                }

                let entry = dir
                    .next_entry()
                    .await
                    .map_err(|source| IndexingError::Walk {
                        path: dir_label(root, &parent),
                        source,
                    })?;
                let Some(entry) = entry else {
                    break;
                };

                let name = entry.file_name().to_string_lossy().into_owned();
                let relative_path = join_relative(&parent, &name);
                let metadata = entry
                    .metadata()
                    .await
                    .map_err(|source| IndexingError::Walk {
                        path: relative_path.clone(),
                        source,
                    })?;

                let is_directory = metadata.is_dir();
                let document = IndexedDocument {
                    root_id: root_id.to_string(),
                    root_display_name: request.display_name.clone(),
                    document_uri: request.location.document_uri(&relative_path),
                    relative_path: relative_path.clone(),
                    mime_type: mime_type_for(&name, is_directory),
                    display_name: name,
                    size_bytes: if is_directory { 0 } else { metadata.len() },
                    last_modified: metadata
                        .modified()
                        .map(|t| DateTime::<Utc>::from(t).timestamp_millis())
                        .unwrap_or(0),
                    is_directory,
                };
                self.discovered += 1;
                if let Some(batch) = self.buffer.push(document) {
                    self.flush(batch).await?;
                }

                if is_directory {
                    subdirs.push((entry.path(), relative_path));
                }
            }

            // reversed so the first subdirectory read is the next one walked
            stack.extend(subdirs.into_iter().rev());
        }

        let remaining = self.buffer.drain();
        if !remaining.is_empty() {
            let count = remaining.len();
            self.pipeline.documents.insert_batch(remaining).await?;
            self.flushed += count as u64;
            self.pipeline.metrics.track_documents_indexed(count);
        }
        Ok(self.flushed)
    }

    async fn flush(&mut self, batch: Vec<IndexedDocument>) -> IndexingResult<()> {
        let count = batch.len();
        self.pipeline.documents.insert_batch(batch).await?;
        self.flushed += count as u64;
        self.pipeline.metrics.track_documents_indexed(count);
        self.pipeline
            .publish(
                self.request.root_id.as_str(),
                ScanMetadata::indexing(self.flushed),
            )
            .await?;
        tracing::debug!(root_id = %self.request.root_id, count = self.flushed, "Batch flushed");
        Ok(())
    }
}

async fn open_dir(path: &Path) -> IndexingResult<ReadDir> {
    fs::read_dir(path)
        .await
        .map_err(|source| IndexingError::Walk {
            path: path.display().to_string(),
            source,
        })
}

fn dir_label(root: &Path, relative_path: &str) -> String {
    if relative_path.is_empty() {
        root.display().to_string()
    } else {
        relative_path.to_string()
    }
}

/// Join a parent's relative path and an entry name; root entries get no
/// leading separator.
pub fn join_relative(parent: &str, name: &str) -> String {
    match (parent.is_empty(), name.is_empty()) {
        (true, _) => name.to_string(),
        (false, true) => parent.to_string(),
        (false, false) => format!("{}/{}", parent, name),
    }
}

fn mime_type_for(name: &str, is_directory: bool) -> Option<String> {
    if is_directory {
        return Some(DIRECTORY_MIME_TYPE.to_string());
    }
    mime_guess::from_path(name).first_raw().map(str::to_string)
}
