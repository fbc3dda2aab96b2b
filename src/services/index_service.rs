//! Index and settings service layer.
//!
//! Root lifecycle (trigger, cancel, remove, status) plus the settings the
//! providers read: provider toggles and the command list.

use crate::error::{IndexingResult, StoreError, StoreResult};
use crate::indexing::{IndexOutcome, IndexScheduler};
use crate::models::{CommandEntry, ScanMetadata};
use crate::repositories::SettingsStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Index service trait for business operations.
#[async_trait]
pub trait IndexService: Send + Sync {
    /// Register a root and start indexing it in the background.
    async fn index_root(
        &self,
        root_id: Option<String>,
        root_uri: Option<String>,
        display_name: Option<String>,
    ) -> IndexingResult<String>;

    /// Cancel a root's pass; `None` when no pass was tracked.
    async fn cancel_indexing(&self, root_id: &str) -> Option<IndexOutcome>;

    /// Forget a root and everything indexed under it.
    async fn remove_root(&self, root_id: &str) -> IndexingResult<usize>;

    /// Scan metadata of one root, or of every root.
    fn scan_status(&self, root_id: Option<&str>) -> BTreeMap<String, ScanMetadata>;

    /// Enable or disable a provider by id.
    async fn set_provider_enabled(&self, provider_id: &str, enabled: bool) -> StoreResult<()>;

    /// Add or replace a user-defined command.
    async fn add_command(&self, command: CommandEntry) -> StoreResult<Vec<CommandEntry>>;

    /// Remove a command; returns whether it existed.
    async fn remove_command(&self, command_id: &str) -> StoreResult<bool>;
}

/// Default implementation of IndexService.
pub struct IndexServiceImpl {
    scheduler: Arc<IndexScheduler>,
    settings: Arc<dyn SettingsStore>,
    provider_ids: Vec<String>,
}

impl IndexServiceImpl {
    /// Create the service. `provider_ids` lists the toggles that may be set.
    pub fn new(
        scheduler: Arc<IndexScheduler>,
        settings: Arc<dyn SettingsStore>,
        provider_ids: Vec<String>,
    ) -> Self {
        Self {
            scheduler,
            settings,
            provider_ids,
        }
    }

    fn validate_command(command: &CommandEntry) -> Result<(), String> {
        if command.id.trim().is_empty() {
            return Err("Command ID cannot be empty".to_string());
        }
        if command.name.trim().is_empty() {
            return Err("Command name cannot be empty".to_string());
        }
        if command.path.trim().is_empty() {
            return Err("Command path cannot be empty".to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl IndexService for IndexServiceImpl {
    async fn index_root(
        &self,
        root_id: Option<String>,
        root_uri: Option<String>,
        display_name: Option<String>,
    ) -> IndexingResult<String> {
        let request = self
            .scheduler
            .trigger(
                root_id.as_deref(),
                root_uri.as_deref(),
                display_name.as_deref(),
            )
            .await?;
        Ok(request.root_id.into_inner())
    }

    async fn cancel_indexing(&self, root_id: &str) -> Option<IndexOutcome> {
        self.scheduler.cancel(root_id).await
    }

    async fn remove_root(&self, root_id: &str) -> IndexingResult<usize> {
        self.scheduler.remove_root(root_id).await
    }

    fn scan_status(&self, root_id: Option<&str>) -> BTreeMap<String, ScanMetadata> {
        let all = self.settings.current().scan_metadata;
        match root_id {
            Some(id) => all.into_iter().filter(|(k, _)| k == id).collect(),
            None => all,
        }
    }

    async fn set_provider_enabled(&self, provider_id: &str, enabled: bool) -> StoreResult<()> {
        if !self.provider_ids.iter().any(|id| id == provider_id) {
            return Err(StoreError::Rejected(format!(
                "Unknown provider: {}",
                provider_id
            )));
        }

        let id = provider_id.to_string();
        self.settings
            .update(Box::new(move |s| s.with_provider_enabled(&id, enabled)))
            .await?;
        tracing::info!(provider = %provider_id, enabled = enabled, "Provider toggled");
        Ok(())
    }

    async fn add_command(&self, command: CommandEntry) -> StoreResult<Vec<CommandEntry>> {
        Self::validate_command(&command).map_err(StoreError::Rejected)?;
        let settings = self
            .settings
            .update(Box::new(move |s| s.with_command(command)))
            .await?;
        Ok(settings.commands)
    }

    async fn remove_command(&self, command_id: &str) -> StoreResult<bool> {
        let existed = self
            .settings
            .current()
            .commands
            .iter()
            .any(|c| c.id == command_id);
        let id = command_id.to_string();
        self.settings
            .update(Box::new(move |s| s.without_command(&id)))
            .await?;
        Ok(existed)
    }
}
