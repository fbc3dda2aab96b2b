use async_trait::async_trait;
use omnisearch_mcp_server::error::{StoreError, StoreResult};
use omnisearch_mcp_server::models::{ScanState, Settings};
use omnisearch_mcp_server::repositories::{InMemorySettingsStore, SettingsStore, SettingsTransform};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock settings store for testing.
///
/// Delegates to an [`InMemorySettingsStore`], counts updates, and can be
/// told to refuse any update that would record a successful scan.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockSettingsStore {
    inner: Arc<InMemorySettingsStore>,
    reject_success: Arc<AtomicBool>,
    updates: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse updates whose result holds SUCCESS metadata for any root.
    pub fn reject_success(&self) {
        self.reject_success.store(true, Ordering::SeqCst);
    }

    /// Number of update calls, refused ones included.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsStore for MockSettingsStore {
    fn current(&self) -> Settings {
        self.inner.current()
    }

    async fn update(&self, transform: SettingsTransform) -> StoreResult<Settings> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if !self.reject_success.load(Ordering::SeqCst) {
            return self.inner.update(transform).await;
        }

        let next = transform(self.inner.current());
        if next
            .scan_metadata
            .values()
            .any(|m| m.state == ScanState::Success)
        {
            return Err(StoreError::Unavailable("settings are read-only".to_string()));
        }
        self.inner.update(Box::new(move |_| next)).await
    }
}
