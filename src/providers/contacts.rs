//! Contacts from the user's contact book.

use crate::cache::CandidateCache;
use crate::cancel::CancellationToken;
use crate::error::{ProviderError, ProviderQueryResult};
use crate::matching::FuzzyMatcher;
use crate::models::{ContactEntry, ProviderResult, Query, ResultAction};
use crate::providers::{check_cancelled, rank_and_truncate, Provider};
use crate::repositories::SettingsStore;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const CONTACTS_PROVIDER_ID: &str = "contacts";

/// Where contacts come from.
#[async_trait]
pub trait ContactSource: Send + Sync {
    async fn load(&self) -> ProviderQueryResult<Vec<ContactEntry>>;
}

/// Contact book stored as a JSON array of [`ContactEntry`].
pub struct JsonContactSource {
    path: PathBuf,
}

impl JsonContactSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ContactSource for JsonContactSource {
    async fn load(&self) -> ProviderQueryResult<Vec<ContactEntry>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            ProviderError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        let contacts: Vec<ContactEntry> = serde_json::from_slice(&bytes).map_err(|e| {
            ProviderError::SourceUnavailable(format!("{}: {}", self.path.display(), e))
        })?;
        Ok(dedup_by_id(contacts))
    }
}

/// Keep the first contact of each id; result ids are built from it.
fn dedup_by_id(contacts: Vec<ContactEntry>) -> Vec<ContactEntry> {
    let mut seen = HashSet::new();
    contacts
        .into_iter()
        .filter(|contact| {
            let first = seen.insert(contact.id.clone());
            if !first {
                tracing::debug!(contact_id = %contact.id, "Dropping contact with repeated id");
            }
            first
        })
        .collect()
}

/// Fixed contact list; used when no contact book is configured.
#[derive(Default)]
pub struct StaticContactSource {
    contacts: Vec<ContactEntry>,
}

impl StaticContactSource {
    pub fn new(contacts: Vec<ContactEntry>) -> Self {
        Self {
            contacts: dedup_by_id(contacts),
        }
    }
}

#[async_trait]
impl ContactSource for StaticContactSource {
    async fn load(&self) -> ProviderQueryResult<Vec<ContactEntry>> {
        Ok(self.contacts.clone())
    }
}

/// Provider over contacts, matched by display name.
pub struct ContactsProvider {
    source: Arc<dyn ContactSource>,
    settings: Arc<dyn SettingsStore>,
    cache: CandidateCache<ContactEntry>,
    max_results: usize,
}

impl ContactsProvider {
    pub fn new(
        source: Arc<dyn ContactSource>,
        settings: Arc<dyn SettingsStore>,
        cache_ttl: Duration,
        max_results: usize,
    ) -> Self {
        Self {
            source,
            settings,
            cache: CandidateCache::new(cache_ttl),
            max_results,
        }
    }
}

#[async_trait]
impl Provider for ContactsProvider {
    fn id(&self) -> &str {
        CONTACTS_PROVIDER_ID
    }

    fn can_handle(&self, query: &Query) -> bool {
        !query.is_blank() && self.settings.is_provider_enabled(CONTACTS_PROVIDER_ID)
    }

    async fn query(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> ProviderQueryResult<Vec<ProviderResult>> {
        let (contacts, _) = self.cache.get_or_load(|| self.source.load()).await?;
        let matcher = FuzzyMatcher::new(query.trimmed_text());

        let mut results = Vec::new();
        for (position, contact) in contacts.iter().enumerate() {
            check_cancelled(position, cancel)?;
            let Some(m) = matcher.match_candidate(&contact.name) else {
                continue;
            };

            let mut result = ProviderResult::new(
                CONTACTS_PROVIDER_ID,
                &contact.id,
                contact.name.clone(),
                m.score as f32,
                ResultAction::OpenContact {
                    phone: contact.phone.clone(),
                    email: contact.email.clone(),
                },
            )
            .with_icon(contact.photo.clone())
            .with_title_indices(m.matched_indices);
            if let Some(detail) = contact.primary_detail() {
                result = result.with_subtitle(detail);
            }
            results.push(result);
        }

        Ok(rank_and_truncate(results, self.max_results))
    }
}
