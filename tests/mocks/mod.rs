//! Test doubles shared by the integration tests.

pub mod mock_document_store;
pub mod mock_providers;
pub mod mock_settings_store;

#[allow(unused_imports)]
pub use mock_document_store::MockDocumentStore;
#[allow(unused_imports)]
pub use mock_providers::{FailingProvider, PanickingProvider, SlowProvider, StaticProvider};
#[allow(unused_imports)]
pub use mock_settings_store::MockSettingsStore;
