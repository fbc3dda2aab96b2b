//! Integration tests for the indexing pipeline.
//!
//! These tests validate:
//! - Replace-not-merge passes (idempotence)
//! - The item cap and batch sizes
//! - Cooperative cancellation and error capture in scan metadata
//! - Relative path construction and document fields
//! - Rejection of invalid trigger input without any mutation
//! - Walking trees deeper than the open-file limit

mod mocks;

use mocks::{MockDocumentStore, MockSettingsStore};
use omnisearch_mcp_server::cancel::CancellationToken;
use omnisearch_mcp_server::domain::IndexRequest;
use omnisearch_mcp_server::error::IndexingError;
use omnisearch_mcp_server::indexing::{
    IndexOutcome, IndexingPipeline, INDEX_BATCH_SIZE, MAX_INDEXED_ITEMS,
};
use omnisearch_mcp_server::models::{ScanState, Settings};
use omnisearch_mcp_server::observability::PassOutcome;
use omnisearch_mcp_server::repositories::{DocumentStore, InMemorySettingsStore, SettingsStore};
use omnisearch_mcp_server::MetricsTracker;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio_test::assert_ok;

struct Harness {
    documents: MockDocumentStore,
    settings: Arc<InMemorySettingsStore>,
    metrics: MetricsTracker,
    pipeline: IndexingPipeline,
}

fn harness(batch_size: usize, max_items: usize) -> Harness {
    let documents = MockDocumentStore::new();
    let settings = Arc::new(InMemorySettingsStore::default());
    let metrics = MetricsTracker::new();
    let pipeline = IndexingPipeline::with_limits(
        Arc::new(documents.clone()),
        settings.clone(),
        metrics.clone(),
        batch_size,
        max_items,
    );
    Harness {
        documents,
        settings,
        metrics,
        pipeline,
    }
}

fn flat_tree(count: usize) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..count {
        fs::File::create(dir.path().join(format!("f{:05}.txt", i))).unwrap();
    }
    dir
}

fn request(root_id: &str, path: &Path) -> IndexRequest {
    IndexRequest::new(
        Some(root_id),
        Some(path.to_str().unwrap()),
        Some("Documents"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_relative_paths_and_document_fields() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("a")).unwrap();
    fs::write(root.path().join("a").join("b"), b"hello").unwrap();
    fs::write(root.path().join("report.pdf"), b"%PDF").unwrap();

    let h = harness(INDEX_BATCH_SIZE, MAX_INDEXED_ITEMS);
    let count = h
        .pipeline
        .index(&request("docs", root.path()), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(count, 3);

    let docs = h.documents.documents().await.unwrap();
    let mut paths: Vec<&str> = docs.iter().map(|d| d.relative_path.as_str()).collect();
    paths.sort();
    assert_eq!(paths, vec!["a", "a/b", "report.pdf"]);

    let dir = docs.iter().find(|d| d.relative_path == "a").unwrap();
    assert!(dir.is_directory);
    assert_eq!(dir.display_name, "a");
    assert_eq!(dir.mime_type.as_deref(), Some("inode/directory"));

    let file = docs.iter().find(|d| d.relative_path == "a/b").unwrap();
    assert!(!file.is_directory);
    assert_eq!(file.display_name, "b");
    assert_eq!(file.size_bytes, 5);
    assert_eq!(file.root_display_name, "Documents");
    assert!(file.document_uri.starts_with("file:///"));
    assert!(file.document_uri.ends_with("/a/b"));
    assert!(file.last_modified > 0);

    let pdf = docs.iter().find(|d| d.relative_path == "report.pdf").unwrap();
    assert_eq!(pdf.mime_type.as_deref(), Some("application/pdf"));
}

#[tokio::test]
async fn test_reindex_replaces_instead_of_accumulating() {
    let root = flat_tree(37);
    let h = harness(10, MAX_INDEXED_ITEMS);
    let req = request("docs", root.path());

    for _ in 0..2 {
        let count = assert_ok!(h.pipeline.index(&req, &CancellationToken::new()).await);
        assert_eq!(count, 37);
        assert_eq!(h.documents.count_for_root("docs").await.unwrap(), 37);

        let settings = h.settings.current();
        let meta = &settings.scan_metadata["docs"];
        assert_eq!(meta.state, ScanState::Success);
        assert_eq!(meta.indexed_item_count, 37);
    }

    assert_eq!(h.documents.get_call_count("delete_root"), 2);
    assert_eq!(h.metrics.index_passes(PassOutcome::Succeeded), 2);
}

#[tokio::test]
async fn test_batches_are_flushed_at_threshold() {
    let root = flat_tree(25);
    let h = harness(10, MAX_INDEXED_ITEMS);

    let outcome = h
        .pipeline
        .run(&request("docs", root.path()), &CancellationToken::new())
        .await;

    assert_eq!(outcome, IndexOutcome::Success { indexed_count: 25 });
    assert_eq!(h.documents.batch_sizes(), vec![10, 10, 5]);
    assert_eq!(h.metrics.documents_indexed_total(), 25);
}

#[tokio::test]
async fn test_cap_stops_walk_at_exactly_max_items() {
    let root = flat_tree(25_000);
    let h = harness(INDEX_BATCH_SIZE, MAX_INDEXED_ITEMS);

    let count = h
        .pipeline
        .index(&request("big", root.path()), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(count, 20_000);
    assert_eq!(h.documents.count_for_root("big").await.unwrap(), 20_000);
    let sizes = h.documents.batch_sizes();
    assert_eq!(sizes.len(), 40);
    assert!(sizes.iter().all(|&s| s == INDEX_BATCH_SIZE));

    let settings = h.settings.current();
    let meta = &settings.scan_metadata["big"];
    assert_eq!(meta.state, ScanState::Success);
    assert_eq!(meta.indexed_item_count, 20_000);
}

#[tokio::test]
async fn test_cap_counts_directories() {
    let root = tempfile::tempdir().unwrap();
    for d in 0..3 {
        let dir = root.path().join(format!("d{}", d));
        fs::create_dir(&dir).unwrap();
        for f in 0..3 {
            fs::File::create(dir.join(format!("f{}", f))).unwrap();
        }
    }
    let h = harness(4, 6);

    let count = h
        .pipeline
        .index(&request("docs", root.path()), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(count, 6);
}

#[tokio::test]
async fn test_cancellation_stops_without_final_flush() {
    let root = flat_tree(100);
    let h = harness(10, MAX_INDEXED_ITEMS);
    let cancel = CancellationToken::new();
    h.documents.cancel_after(2, cancel.clone());

    let result = h.pipeline.index(&request("docs", root.path()), &cancel).await;

    assert!(matches!(result, Err(IndexingError::Cancelled)));
    assert_eq!(h.documents.batch_sizes(), vec![10, 10]);

    let stored = h.documents.count_for_root("docs").await.unwrap();
    assert!(stored <= 100);

    // metadata keeps what the last flush published
    let settings = h.settings.current();
    let meta = &settings.scan_metadata["docs"];
    assert_eq!(meta.state, ScanState::Indexing);
    assert_eq!(meta.indexed_item_count, 20);
    assert_eq!(h.metrics.index_passes(PassOutcome::Cancelled), 1);
}

#[tokio::test]
async fn test_cancelled_before_start_writes_nothing_new() {
    let root = flat_tree(5);
    let h = harness(10, MAX_INDEXED_ITEMS);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let outcome = h.pipeline.run(&request("docs", root.path()), &cancel).await;
    assert_eq!(outcome, IndexOutcome::Cancelled);
    assert!(h.documents.batch_sizes().is_empty());
}

#[tokio::test]
async fn test_store_failure_is_recorded_as_error() {
    let root = flat_tree(30);
    let h = harness(10, MAX_INDEXED_ITEMS);
    h.documents.fail_after(1);

    let outcome = h
        .pipeline
        .run(&request("docs", root.path()), &CancellationToken::new())
        .await;
    assert_eq!(outcome, IndexOutcome::Failure);

    let settings = h.settings.current();
    let meta = &settings.scan_metadata["docs"];
    assert_eq!(meta.state, ScanState::Error);
    assert_eq!(meta.indexed_item_count, 10);
    assert!(meta.error_message.as_deref().unwrap().contains("disk full"));
    assert_eq!(h.metrics.index_passes(PassOutcome::Failed), 1);
}

#[tokio::test]
async fn test_failed_success_publish_is_recorded_as_error() {
    let root = flat_tree(25);
    let documents = MockDocumentStore::new();
    let settings = MockSettingsStore::new();
    settings.reject_success();
    let metrics = MetricsTracker::new();
    let pipeline = IndexingPipeline::with_limits(
        Arc::new(documents.clone()),
        Arc::new(settings.clone()),
        metrics.clone(),
        10,
        MAX_INDEXED_ITEMS,
    );

    let outcome = pipeline
        .run(&request("docs", root.path()), &CancellationToken::new())
        .await;
    assert_eq!(outcome, IndexOutcome::Failure);

    let current = settings.current();
    let meta = &current.scan_metadata["docs"];
    assert_eq!(meta.state, ScanState::Error);
    assert_eq!(meta.indexed_item_count, 25);
    assert!(meta.error_message.as_deref().unwrap().contains("read-only"));
    assert_eq!(metrics.index_passes(PassOutcome::Failed), 1);
    assert_eq!(metrics.index_passes(PassOutcome::Succeeded), 0);
}

#[tokio::test]
async fn test_deep_tree_is_walked_to_the_bottom() {
    const DEPTH: usize = 300;
    let root = tempfile::tempdir().unwrap();
    let mut deepest = root.path().to_path_buf();
    for _ in 0..DEPTH {
        deepest.push("d");
    }
    fs::create_dir_all(&deepest).unwrap();
    fs::write(deepest.join("leaf.txt"), b"leaf").unwrap();

    let h = harness(INDEX_BATCH_SIZE, MAX_INDEXED_ITEMS);
    let count = h
        .pipeline
        .index(&request("deep", root.path()), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(count, DEPTH as u64 + 1);

    let expected = format!("{}leaf.txt", "d/".repeat(DEPTH));
    let docs = h.documents.documents().await.unwrap();
    let leaf = docs.iter().find(|d| d.display_name == "leaf.txt").unwrap();
    assert_eq!(leaf.relative_path, expected);
    assert!(!leaf.is_directory);
}

#[tokio::test]
async fn test_invalid_input_mutates_nothing() {
    let h = harness(10, MAX_INDEXED_ITEMS);
    let file = tempfile::NamedTempFile::new().unwrap();
    let cancel = CancellationToken::new();

    let cases: Vec<(Option<&str>, Option<&str>, Option<&str>)> = vec![
        (None, Some("/tmp"), Some("Tmp")),
        (Some("  "), Some("/tmp"), Some("Tmp")),
        (Some("tmp"), None, Some("Tmp")),
        (Some("tmp"), Some("/tmp"), Some("")),
        (Some("tmp"), Some("content://com.android.externalstorage/tree/primary"), Some("Tmp")),
        (Some("tmp"), Some("/nonexistent/omnisearch/root"), Some("Tmp")),
        (Some("tmp"), Some("target/relative/root"), Some("Tmp")),
        (Some("tmp"), file.path().to_str(), Some("Tmp")),
    ];

    for (root_id, root_uri, display_name) in cases {
        let outcome = h
            .pipeline
            .run_job(root_id, root_uri, display_name, &cancel)
            .await;
        assert_eq!(outcome, IndexOutcome::Failure);
    }

    assert_eq!(h.settings.current(), Settings::default());
    assert_eq!(h.documents.get_call_count("delete_root"), 0);
    assert_eq!(h.documents.get_call_count("insert_batch"), 0);
}

#[tokio::test]
async fn test_file_uri_root() {
    let root = flat_tree(3);
    let uri = format!("file://{}", root.path().display());
    let h = harness(10, MAX_INDEXED_ITEMS);

    let outcome = h
        .pipeline
        .run_job(Some("docs"), Some(&uri), Some("Docs"), &CancellationToken::new())
        .await;
    assert_eq!(outcome, IndexOutcome::Success { indexed_count: 3 });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_roots_keep_each_others_metadata() {
    let roots: Vec<TempDir> = (0..4).map(|i| flat_tree(20 + i)).collect();
    let h = Arc::new(harness(5, MAX_INDEXED_ITEMS));

    let mut tasks = Vec::new();
    for (i, root) in roots.iter().enumerate() {
        let h = h.clone();
        let req = request(&format!("root{}", i), root.path());
        tasks.push(tokio::spawn(async move {
            h.pipeline.index(&req, &CancellationToken::new()).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let settings = h.settings.current();
    assert_eq!(settings.scan_metadata.len(), 4);
    for i in 0..4 {
        let meta = &settings.scan_metadata[&format!("root{}", i)];
        assert_eq!(meta.state, ScanState::Success);
        assert_eq!(meta.indexed_item_count, 20 + i as u64);
    }
}
