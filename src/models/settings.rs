//! The settings record shared by providers and the indexing pipeline.
//!
//! The record is only ever replaced whole through
//! [`crate::repositories::SettingsStore::update`]; the helpers here are pure
//! transforms that merge into the existing maps.

use super::document::ScanMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A root the user has asked to index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexedRoot {
    pub uri: String,
    pub display_name: String,
}

/// A user-defined command exposed through the commands provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandEntry {
    /// Stable identifier used in result ids
    pub id: String,

    /// Display name
    pub name: String,

    /// Executable path
    pub path: String,
}

/// Persisted configuration and scan progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Provider id -> enabled; absent means enabled
    pub provider_enabled: BTreeMap<String, bool>,

    /// Known roots keyed by root id
    pub roots: BTreeMap<String, IndexedRoot>,

    /// Latest pass state keyed by root id
    pub scan_metadata: BTreeMap<String, ScanMetadata>,

    /// User-defined commands
    pub commands: Vec<CommandEntry>,

    /// Relative path prefixes hidden from file results
    pub excluded_paths: Vec<String>,
}

impl Settings {
    /// Whether the provider is enabled; providers default to enabled.
    pub fn is_provider_enabled(&self, provider_id: &str) -> bool {
        self.provider_enabled
            .get(provider_id)
            .copied()
            .unwrap_or(true)
    }

    pub fn with_provider_enabled(mut self, provider_id: &str, enabled: bool) -> Self {
        self.provider_enabled
            .insert(provider_id.to_string(), enabled);
        self
    }

    /// Replace one root's scan metadata, leaving every other root untouched.
    pub fn with_scan_metadata(mut self, root_id: &str, metadata: ScanMetadata) -> Self {
        self.scan_metadata.insert(root_id.to_string(), metadata);
        self
    }

    /// Register a root, creating its IDLE scan entry if it has none.
    pub fn with_root(mut self, root_id: &str, root: IndexedRoot) -> Self {
        self.roots.insert(root_id.to_string(), root);
        self.scan_metadata
            .entry(root_id.to_string())
            .or_insert_with(ScanMetadata::idle);
        self
    }

    /// Forget a root and its scan metadata.
    pub fn without_root(mut self, root_id: &str) -> Self {
        self.roots.remove(root_id);
        self.scan_metadata.remove(root_id);
        self
    }

    /// Add or replace a command by id.
    pub fn with_command(mut self, command: CommandEntry) -> Self {
        self.commands.retain(|c| c.id != command.id);
        self.commands.push(command);
        self
    }

    pub fn without_command(mut self, command_id: &str) -> Self {
        self.commands.retain(|c| c.id != command_id);
        self
    }

    /// True when `relative_path` falls under an excluded prefix.
    pub fn is_path_excluded(&self, relative_path: &str) -> bool {
        self.excluded_paths.iter().any(|prefix| {
            let prefix = prefix.trim_matches('/');
            !prefix.is_empty()
                && (relative_path == prefix
                    || relative_path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('/')))
        })
    }
}
