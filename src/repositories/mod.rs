//! Storage contracts and their implementations.
//!
//! The document store and settings store are external collaborators; this
//! module defines the traits the core consumes and ships in-memory and
//! JSON-file implementations for the server and tests.

mod in_memory_document_store;
mod settings_store;
mod traits;

pub use in_memory_document_store::InMemoryDocumentStore;
pub use settings_store::{InMemorySettingsStore, JsonSettingsStore};
pub use traits::{DocumentStore, SettingsStore, SettingsTransform};
