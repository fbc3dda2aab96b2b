use crate::error::StoreResult;
use crate::models::IndexedDocument;
use crate::repositories::traits::DocumentStore;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

/// Document store kept in process memory.
///
/// Documents are grouped by root and keyed by URI, so re-inserting an
/// existing URI replaces it and `documents()` is returned in a stable
/// (root, URI) order.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    roots: RwLock<HashMap<String, BTreeMap<String, IndexedDocument>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_batch(&self, documents: Vec<IndexedDocument>) -> StoreResult<()> {
        let mut roots = self.roots.write().await;
        for document in documents {
            roots
                .entry(document.root_id.clone())
                .or_default()
                .insert(document.document_uri.clone(), document);
        }
        Ok(())
    }

    async fn delete_root(&self, root_id: &str) -> StoreResult<usize> {
        let mut roots = self.roots.write().await;
        Ok(roots.remove(root_id).map(|docs| docs.len()).unwrap_or(0))
    }

    async fn documents(&self) -> StoreResult<Vec<IndexedDocument>> {
        let roots = self.roots.read().await;
        let mut root_ids: Vec<&String> = roots.keys().collect();
        root_ids.sort();

        Ok(root_ids
            .into_iter()
            .flat_map(|id| roots[id].values().cloned())
            .collect())
    }

    async fn count_for_root(&self, root_id: &str) -> StoreResult<usize> {
        let roots = self.roots.read().await;
        Ok(roots.get(root_id).map(|docs| docs.len()).unwrap_or(0))
    }
}
