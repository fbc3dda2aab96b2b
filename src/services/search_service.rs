//! Search service layer.
//!
//! Runs aggregated searches and acts on results from the latest one.

use crate::aggregator::SearchAggregator;
use crate::error::{SearchError, SearchResult};
use crate::launcher::ActionLauncher;
use crate::models::{ProviderResult, Query, QuerySource};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Longest query text accepted, in characters.
pub const MAX_QUERY_CHARS: usize = 256;

/// What happened when a result was opened.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OpenReport {
    pub result_id: String,
    pub launched: bool,

    /// One-shot message for the user when the launch failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<String>,
}

/// Search service trait for business operations.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Search every provider and return the merged ranking.
    ///
    /// A search started while another is in flight supersedes it.
    async fn search(&self, text: String, source: QuerySource)
        -> SearchResult<Vec<ProviderResult>>;

    /// Run the action of a result from the most recent published search.
    async fn open_result(&self, result_id: &str) -> SearchResult<OpenReport>;
}

/// Default implementation of SearchService.
pub struct SearchServiceImpl {
    aggregator: Arc<SearchAggregator>,
    launcher: Arc<dyn ActionLauncher>,
    last_results: RwLock<HashMap<String, ProviderResult>>,
}

impl SearchServiceImpl {
    pub fn new(aggregator: Arc<SearchAggregator>, launcher: Arc<dyn ActionLauncher>) -> Self {
        Self {
            aggregator,
            launcher,
            last_results: RwLock::new(HashMap::new()),
        }
    }

    fn validate_query(text: &str) -> Result<(), String> {
        if text.chars().count() > MAX_QUERY_CHARS {
            return Err(format!(
                "Search query too long (max {} characters)",
                MAX_QUERY_CHARS
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchService for SearchServiceImpl {
    async fn search(
        &self,
        text: String,
        source: QuerySource,
    ) -> SearchResult<Vec<ProviderResult>> {
        Self::validate_query(&text).map_err(SearchError::InvalidParameters)?;

        let query = Query::new(text, source);
        let cancel = self.aggregator.begin_pass();
        let results = self.aggregator.search_with_token(&query, &cancel).await?;

        let mut last = self.last_results.write().await;
        // a newer pass may have started while this one waited for the lock
        if cancel.is_cancelled() {
            return Err(SearchError::Superseded);
        }
        *last = results
            .iter()
            .map(|r| (r.id.clone(), r.clone()))
            .collect();

        Ok(results)
    }

    async fn open_result(&self, result_id: &str) -> SearchResult<OpenReport> {
        let result = self
            .last_results
            .read()
            .await
            .get(result_id)
            .cloned()
            .ok_or_else(|| SearchError::UnknownResult(result_id.to_string()))?;

        match self.launcher.launch(&result.action).await {
            Ok(()) => Ok(OpenReport {
                result_id: result.id,
                launched: true,
                notification: None,
            }),
            Err(e) => {
                tracing::warn!(result_id = %result.id, "Launch failed: {}", e);
                Ok(OpenReport {
                    notification: Some(format!("Could not open {}: {}", result.title, e)),
                    result_id: result.id,
                    launched: false,
                })
            }
        }
    }
}
