//! Indexed files and directories.

use crate::cancel::CancellationToken;
use crate::error::ProviderQueryResult;
use crate::matching::FuzzyMatcher;
use crate::models::{ProviderResult, Query, ResultAction};
use crate::providers::{check_cancelled, rank_and_truncate, Provider};
use crate::repositories::{DocumentStore, SettingsStore};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub const FILES_PROVIDER_ID: &str = "files";

/// Provider over the document store filled by the indexing pipeline.
///
/// Reads whatever is stored at query time, so a root that is still being
/// indexed contributes its already-flushed batches.
pub struct FilesProvider {
    documents: Arc<dyn DocumentStore>,
    settings: Arc<dyn SettingsStore>,
    max_results: usize,
}

impl FilesProvider {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        settings: Arc<dyn SettingsStore>,
        max_results: usize,
    ) -> Self {
        Self {
            documents,
            settings,
            max_results,
        }
    }
}

#[async_trait]
impl Provider for FilesProvider {
    fn id(&self) -> &str {
        FILES_PROVIDER_ID
    }

    fn can_handle(&self, query: &Query) -> bool {
        !query.is_blank() && self.settings.is_provider_enabled(FILES_PROVIDER_ID)
    }

    async fn query(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> ProviderQueryResult<Vec<ProviderResult>> {
        let documents = self.documents.documents().await?;
        let settings = self.settings.current();
        let matcher = FuzzyMatcher::new(query.trimmed_text());

        let mut results = Vec::new();
        for (position, doc) in documents.into_iter().enumerate() {
            check_cancelled(position, cancel)?;
            if settings.is_path_excluded(&doc.relative_path) {
                continue;
            }
            let Some(m) = matcher.match_candidate(&doc.display_name) else {
                continue;
            };

            // roots may overlap, so the same file can be stored under two roots
            let item_id = format!("{}:{}", doc.root_id, doc.relative_path);
            let result = ProviderResult::new(
                FILES_PROVIDER_ID,
                &item_id,
                doc.display_name.clone(),
                m.score as f32,
                ResultAction::OpenUri {
                    uri: doc.document_uri.clone(),
                    mime_type: doc.mime_type.clone(),
                },
            )
            .with_subtitle(format!("{}/{}", doc.root_display_name, doc.relative_path))
            .with_title_indices(m.matched_indices)
            .with_extra("size_bytes", json!(doc.size_bytes))
            .with_extra("last_modified", json!(doc.last_modified))
            .with_extra("is_directory", json!(doc.is_directory));
            results.push(result);
        }

        Ok(rank_and_truncate(results, self.max_results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{IndexedDocument, Settings};
    use crate::repositories::{InMemoryDocumentStore, InMemorySettingsStore};

    fn doc(relative_path: &str) -> IndexedDocument {
        let display_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
        IndexedDocument {
            root_id: "docs".to_string(),
            root_display_name: "Documents".to_string(),
            document_uri: format!("file:///home/u/Documents/{}", relative_path),
            relative_path: relative_path.to_string(),
            display_name: display_name.to_string(),
            mime_type: Some("application/pdf".to_string()),
            size_bytes: 1024,
            last_modified: 1_700_000_000_000,
            is_directory: false,
        }
    }

    async fn provider(settings: Settings, docs: Vec<IndexedDocument>) -> FilesProvider {
        let store = Arc::new(InMemoryDocumentStore::new());
        store.insert_batch(docs).await.unwrap();
        FilesProvider::new(store, Arc::new(InMemorySettingsStore::new(settings)), 10)
    }

    #[tokio::test]
    async fn test_query_builds_open_uri_result() {
        let provider = provider(
            Settings::default(),
            vec![doc("work/report.pdf"), doc("notes.txt")],
        )
        .await;

        let results = provider
            .query(&Query::user("report"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.id, "files:docs:work/report.pdf");
        assert_eq!(r.subtitle.as_deref(), Some("Documents/work/report.pdf"));
        assert_eq!(r.extras["size_bytes"], json!(1024));
        assert_eq!(r.extras["is_directory"], json!(false));
        assert!(matches!(
            &r.action,
            ResultAction::OpenUri { mime_type: Some(m), .. } if m == "application/pdf"
        ));
    }

    #[tokio::test]
    async fn test_same_file_under_two_roots_gets_distinct_ids() {
        let mut nested = doc("report.pdf");
        nested.root_id = "home".to_string();
        nested.relative_path = "Documents/report.pdf".to_string();
        let provider = provider(Settings::default(), vec![doc("report.pdf"), nested]).await;

        let results = provider
            .query(&Query::user("report"), &CancellationToken::new())
            .await
            .unwrap();
        let mut ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["files:docs:report.pdf", "files:home:Documents/report.pdf"]);
    }

    #[tokio::test]
    async fn test_excluded_paths_are_hidden() {
        let settings = Settings {
            excluded_paths: vec!["build".to_string()],
            ..Default::default()
        };
        let provider = provider(settings, vec![doc("build/report.pdf"), doc("report.pdf")]).await;

        let results = provider
            .query(&Query::user("report"), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].subtitle.as_deref(), Some("Documents/report.pdf"));
    }

    #[tokio::test]
    async fn test_disabled_provider_cannot_handle() {
        let provider = provider(
            Settings::default().with_provider_enabled(FILES_PROVIDER_ID, false),
            vec![],
        )
        .await;
        assert!(!provider.can_handle(&Query::user("report")));
    }
}
