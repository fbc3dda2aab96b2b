//! Indexed filesystem document and per-root scan state.

use serde::{Deserialize, Serialize};

/// Metadata of one filesystem entry discovered during an indexing pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexedDocument {
    /// Root this entry belongs to
    pub root_id: String,

    /// Display name of that root
    pub root_display_name: String,

    /// Unique per root + path
    pub document_uri: String,

    /// Path below the root, `/`-joined, without a leading separator
    pub relative_path: String,

    /// Entry name
    pub display_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    pub size_bytes: u64,

    /// Epoch milliseconds
    pub last_modified: i64,

    pub is_directory: bool,
}

/// State of a root's most recent indexing pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanState {
    #[default]
    Idle,
    Indexing,
    Success,
    Error,
}

impl ScanState {
    /// True for the states that end a pass.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

/// Persisted progress/outcome of a root's most recent pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ScanMetadata {
    pub state: ScanState,
    pub indexed_item_count: u64,
    pub updated_at_millis: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ScanMetadata {
    fn stamped(state: ScanState, indexed_item_count: u64, error_message: Option<String>) -> Self {
        Self {
            state,
            indexed_item_count,
            updated_at_millis: chrono::Utc::now().timestamp_millis(),
            error_message,
        }
    }

    /// A registered root that has not been indexed yet.
    pub fn idle() -> Self {
        Self::stamped(ScanState::Idle, 0, None)
    }

    /// A pass in progress with `count` items flushed so far.
    pub fn indexing(count: u64) -> Self {
        Self::stamped(ScanState::Indexing, count, None)
    }

    /// A pass that finished with `count` items.
    pub fn success(count: u64) -> Self {
        Self::stamped(ScanState::Success, count, None)
    }

    /// A pass that failed after flushing `count` items.
    pub fn error(count: u64, message: impl Into<String>) -> Self {
        Self::stamped(ScanState::Error, count, Some(message.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serialization() {
        let meta = ScanMetadata::error(3, "Permission denied");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["state"], "ERROR");
        assert_eq!(json["indexed_item_count"], 3);
        assert_eq!(json["error_message"], "Permission denied");
    }

    #[test]
    fn test_constructors_stamp_time() {
        let meta = ScanMetadata::indexing(0);
        assert_eq!(meta.state, ScanState::Indexing);
        assert!(meta.updated_at_millis > 0);
        assert!(meta.error_message.is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(ScanState::Success.is_terminal());
        assert!(ScanState::Error.is_terminal());
        assert!(!ScanState::Indexing.is_terminal());
        assert!(!ScanState::Idle.is_terminal());
    }
}
