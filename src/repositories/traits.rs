use crate::error::StoreResult;
use crate::models::{IndexedDocument, Settings};
use async_trait::async_trait;

/// Durable storage for indexed documents.
///
/// Only the narrow contract the indexing pipeline and the files provider
/// need: bulk insert, delete-by-root and read-back. Implementations must
/// tolerate readers while a write is in flight; a partially flushed root
/// is a valid thing to observe.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a batch in one operation. A document whose URI already exists
    /// for the same root replaces the stored one.
    async fn insert_batch(&self, documents: Vec<IndexedDocument>) -> StoreResult<()>;

    /// Delete every document of a root, returning how many were removed.
    async fn delete_root(&self, root_id: &str) -> StoreResult<usize>;

    /// Snapshot of all stored documents.
    async fn documents(&self) -> StoreResult<Vec<IndexedDocument>>;

    /// Number of documents stored for a root.
    async fn count_for_root(&self, root_id: &str) -> StoreResult<usize>;
}

/// A pure function deriving the next settings record from the current one.
pub type SettingsTransform = Box<dyn FnOnce(Settings) -> Settings + Send>;

/// Store for the settings record.
///
/// Every mutation is a read-transform-write performed atomically with
/// respect to other updates, so concurrent writers never lose each other's
/// changes as long as transforms merge instead of overwrite.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Snapshot of the current record.
    fn current(&self) -> Settings;

    /// Atomically replace the record with `transform(current)`.
    async fn update(&self, transform: SettingsTransform) -> StoreResult<Settings>;

    /// Shortcut for the provider toggle lookup used by `can_handle`.
    fn is_provider_enabled(&self, provider_id: &str) -> bool {
        self.current().is_provider_enabled(provider_id)
    }
}
