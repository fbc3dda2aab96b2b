//! Installed applications from XDG desktop entries.

use crate::cache::CandidateCache;
use crate::cancel::CancellationToken;
use crate::error::{ProviderError, ProviderQueryResult};
use crate::matching::FuzzyMatcher;
use crate::models::{AppEntry, ProviderResult, Query, ResultAction};
use crate::providers::{check_cancelled, rank_and_truncate, Provider};
use crate::repositories::SettingsStore;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const APPS_PROVIDER_ID: &str = "apps";

/// Exec field codes (`%f`, `%U`, ...) that launchers substitute.
static FIELD_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*%[fFuUdDnNickvm]").expect("Failed to compile field code regex"));

/// Parse the `[Desktop Entry]` group of a desktop file.
///
/// Returns `None` for entries that are not launchable applications or are
/// marked hidden.
pub fn parse_desktop_entry(id: &str, contents: &str) -> Option<AppEntry> {
    let mut in_entry = false;
    let mut name = None;
    let mut comment = None;
    let mut exec = None;
    let mut icon = None;
    let mut terminal = false;
    let mut entry_type = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') {
            in_entry = line == "[Desktop Entry]";
            continue;
        }
        if !in_entry {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "Name" => name = Some(value.to_string()),
            "Comment" => comment = Some(value.to_string()),
            "Exec" => exec = Some(value.to_string()),
            "Icon" => icon = Some(value.to_string()),
            "Type" => entry_type = Some(value.to_string()),
            "Terminal" => terminal = value.eq_ignore_ascii_case("true"),
            "NoDisplay" | "Hidden" if value.eq_ignore_ascii_case("true") => return None,
            _ => {}
        }
    }

    if entry_type.as_deref() != Some("Application") {
        return None;
    }

    let exec = FIELD_CODE_REGEX
        .replace_all(&exec?, "")
        .replace("%%", "%")
        .trim()
        .to_string();
    let name = name?;
    if name.is_empty() || exec.is_empty() {
        return None;
    }

    Some(AppEntry {
        id: id.to_string(),
        name,
        comment: comment.filter(|c| !c.is_empty()),
        exec,
        icon: icon.filter(|i| !i.is_empty()),
        terminal,
    })
}

/// Scan `dirs` for desktop entries; the first directory to define an id wins.
async fn scan_desktop_dirs(dirs: &[PathBuf]) -> ProviderQueryResult<Vec<AppEntry>> {
    let mut seen = HashSet::new();
    let mut apps = Vec::new();

    for dir in dirs {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %dir.display(), "Application directory missing");
                continue;
            }
            Err(e) => {
                return Err(ProviderError::SourceUnavailable(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ProviderError::SourceUnavailable(e.to_string()))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("desktop") {
                files.push(path);
            }
        }
        files.sort();

        for path in files {
            let Some(id) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }
            match tokio::fs::read_to_string(&path).await {
                Ok(contents) => {
                    seen.insert(id.clone());
                    if let Some(app) = parse_desktop_entry(&id, &contents) {
                        apps.push(app);
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "Skipping unreadable desktop entry: {}", e);
                }
            }
        }
    }

    tracing::info!(count = apps.len(), "Application list loaded");
    Ok(apps)
}

/// Provider over installed applications.
pub struct AppsProvider {
    dirs: Vec<PathBuf>,
    settings: Arc<dyn SettingsStore>,
    cache: CandidateCache<AppEntry>,
    max_results: usize,
}

impl AppsProvider {
    pub fn new(
        dirs: Vec<PathBuf>,
        settings: Arc<dyn SettingsStore>,
        cache_ttl: Duration,
        max_results: usize,
    ) -> Self {
        Self {
            dirs,
            settings,
            cache: CandidateCache::new(cache_ttl),
            max_results,
        }
    }

    /// Force a rescan on the next query.
    pub async fn invalidate(&self) {
        self.cache.invalidate().await;
    }
}

#[async_trait]
impl Provider for AppsProvider {
    fn id(&self) -> &str {
        APPS_PROVIDER_ID
    }

    fn can_handle(&self, query: &Query) -> bool {
        !query.is_blank() && self.settings.is_provider_enabled(APPS_PROVIDER_ID)
    }

    async fn query(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> ProviderQueryResult<Vec<ProviderResult>> {
        let (apps, _) = self
            .cache
            .get_or_load(|| scan_desktop_dirs(&self.dirs))
            .await?;
        let matcher = FuzzyMatcher::new(query.trimmed_text());

        let mut results = Vec::new();
        for (position, app) in apps.iter().enumerate() {
            check_cancelled(position, cancel)?;
            let Some(m) = matcher.match_candidate(&app.name) else {
                continue;
            };

            let mut result = ProviderResult::new(
                APPS_PROVIDER_ID,
                &app.id,
                app.name.clone(),
                m.score as f32,
                ResultAction::LaunchApp {
                    exec: app.exec.clone(),
                    terminal: app.terminal,
                },
            )
            .with_icon(app.icon.clone())
            .with_title_indices(m.matched_indices);
            if let Some(comment) = &app.comment {
                result = result.with_subtitle(comment.clone());
            }
            results.push(result);
        }

        Ok(rank_and_truncate(results, self.max_results))
    }
}
