//! Data models for queries, results, indexed documents and settings.
//!
//! Queries and provider results are ephemeral and rebuilt per pass;
//! indexed documents and the settings record are persisted through the
//! stores in [`crate::repositories`].

pub mod candidates;
pub mod document;
pub mod provider_result;
pub mod query;
pub mod settings;

pub use candidates::{AppEntry, ContactEntry};
pub use document::{IndexedDocument, ScanMetadata, ScanState};
pub use provider_result::{sort_by_score_desc, ProviderResult, ResultAction};
pub use query::{Query, QuerySource};
pub use settings::{CommandEntry, IndexedRoot, Settings};
