//! Query model representing one search trigger.

use serde::{Deserialize, Serialize};

/// Where a query came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuerySource {
    /// Typed by the user
    #[default]
    UserInput,
    /// Fired from a shortcut
    Shortcut,
    /// Issued by code
    Programmatic,
}

/// An immutable search query, built once per keystroke or trigger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Query {
    /// Raw text as entered
    pub text: String,

    /// Origin of the query
    #[serde(default)]
    pub source: QuerySource,
}

impl Query {
    /// Create a query with an explicit source.
    pub fn new(text: impl Into<String>, source: QuerySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// Create a query typed by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, QuerySource::UserInput)
    }

    /// Text with leading and trailing whitespace removed.
    pub fn trimmed_text(&self) -> &str {
        self.text.trim()
    }

    /// True when there is nothing but whitespace to search for.
    pub fn is_blank(&self) -> bool {
        self.trimmed_text().is_empty()
    }
}
