//! User-defined commands stored in settings.

use crate::cancel::CancellationToken;
use crate::error::ProviderQueryResult;
use crate::matching::{FuzzyMatcher, MatchResult};
use crate::models::{CommandEntry, ProviderResult, Query, ResultAction};
use crate::providers::{check_cancelled, rank_and_truncate, Provider};
use crate::repositories::SettingsStore;
use async_trait::async_trait;
use std::sync::Arc;

pub const COMMANDS_PROVIDER_ID: &str = "commands";

/// Subtracted from a match against the executable path so that a name
/// match of similar quality ranks first.
pub const PATH_MATCH_PENALTY: i32 = 10;

enum MatchedField {
    Name,
    Path,
}

/// Best of the name match and the penalised path match; the name wins ties.
fn best_match(
    matcher: &FuzzyMatcher,
    command: &CommandEntry,
) -> Option<(MatchResult, MatchedField)> {
    let by_name = matcher.match_candidate(&command.name);
    let by_path = matcher.match_candidate(&command.path).map(|mut m| {
        m.score -= PATH_MATCH_PENALTY;
        m
    });

    match (by_name, by_path) {
        (Some(n), Some(p)) if p.score > n.score => Some((p, MatchedField::Path)),
        (Some(n), _) => Some((n, MatchedField::Name)),
        (None, Some(p)) => Some((p, MatchedField::Path)),
        (None, None) => None,
    }
}

/// Provider over the commands list in the settings record.
pub struct CommandsProvider {
    settings: Arc<dyn SettingsStore>,
    max_results: usize,
}

impl CommandsProvider {
    pub fn new(settings: Arc<dyn SettingsStore>, max_results: usize) -> Self {
        Self {
            settings,
            max_results,
        }
    }
}

#[async_trait]
impl Provider for CommandsProvider {
    fn id(&self) -> &str {
        COMMANDS_PROVIDER_ID
    }

    fn can_handle(&self, query: &Query) -> bool {
        !query.is_blank() && self.settings.is_provider_enabled(COMMANDS_PROVIDER_ID)
    }

    async fn query(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> ProviderQueryResult<Vec<ProviderResult>> {
        let commands = self.settings.current().commands;
        let matcher = FuzzyMatcher::new(query.trimmed_text());

        let mut results = Vec::new();
        for (position, command) in commands.iter().enumerate() {
            check_cancelled(position, cancel)?;
            let Some((m, field)) = best_match(&matcher, command) else {
                continue;
            };

            let result = ProviderResult::new(
                COMMANDS_PROVIDER_ID,
                &command.id,
                command.name.clone(),
                m.score as f32,
                ResultAction::RunCommand {
                    path: command.path.clone(),
                },
            )
            .with_subtitle(command.path.clone());
            let result = match field {
                MatchedField::Name => result.with_title_indices(m.matched_indices),
                MatchedField::Path => result.with_subtitle_indices(m.matched_indices),
            };
            results.push(result);
        }

        Ok(rank_and_truncate(results, self.max_results))
    }
}
