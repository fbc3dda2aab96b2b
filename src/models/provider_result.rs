//! Ranked result emitted by a provider for one query pass.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What happens when a result is selected.
///
/// The decision is made by the provider; the mechanism that carries it out
/// lives behind [`crate::launcher::ActionLauncher`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultAction {
    /// Open a document or directory with the system handler
    OpenUri {
        uri: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },

    /// Start a desktop application
    LaunchApp { exec: String, terminal: bool },

    /// Reach a contact by phone or email
    OpenContact {
        #[serde(skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },

    /// Run a user-defined command
    RunCommand { path: String },
}

/// A single entry in a provider's ranked result list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderResult {
    /// Globally unique id, `"<provider_id>:<item_id>"`
    pub id: String,

    /// Primary text
    pub title: String,

    /// Secondary text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// Icon name or path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Provider that produced the result
    pub provider_id: String,

    /// Ranking score; higher is better
    pub score: f32,

    /// Char offsets in `title` to highlight
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_title_indices: Vec<usize>,

    /// Char offsets in `subtitle` to highlight
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub matched_subtitle_indices: Vec<usize>,

    /// Action run on selection
    pub action: ResultAction,

    /// Provider-specific payload
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extras: HashMap<String, serde_json::Value>,
}

impl ProviderResult {
    /// Create a result with the namespaced id `"<provider_id>:<item_id>"`.
    pub fn new(
        provider_id: &str,
        item_id: &str,
        title: impl Into<String>,
        score: f32,
        action: ResultAction,
    ) -> Self {
        Self {
            id: format!("{}:{}", provider_id, item_id),
            title: title.into(),
            subtitle: None,
            icon: None,
            provider_id: provider_id.to_string(),
            score,
            matched_title_indices: Vec::new(),
            matched_subtitle_indices: Vec::new(),
            action,
            extras: HashMap::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    pub fn with_title_indices(mut self, indices: Vec<usize>) -> Self {
        self.matched_title_indices = indices;
        self
    }

    pub fn with_subtitle_indices(mut self, indices: Vec<usize>) -> Self {
        self.matched_subtitle_indices = indices;
        self
    }

    pub fn with_extra(mut self, key: &str, value: serde_json::Value) -> Self {
        self.extras.insert(key.to_string(), value);
        self
    }
}

/// Sort results by descending score, keeping the existing order on ties.
pub fn sort_by_score_desc(results: &mut [ProviderResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}
