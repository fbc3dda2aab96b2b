//! Search providers.
//!
//! Every provider wraps one candidate set and exposes the same capability:
//! a cheap `can_handle` pre-filter and a `query` that matches with
//! [`crate::matching::FuzzyMatcher`] and returns results sorted by
//! descending score. Providers are held as `Arc<dyn Provider>` in a list
//! whose order is their priority in the merged ranking.

pub mod apps;
pub mod commands;
pub mod contacts;
pub mod files;

pub use apps::{parse_desktop_entry, AppsProvider};
pub use commands::{CommandsProvider, PATH_MATCH_PENALTY};
pub use contacts::{ContactSource, ContactsProvider, JsonContactSource, StaticContactSource};
pub use files::FilesProvider;

use crate::cancel::CancellationToken;
use crate::error::ProviderQueryResult;
use crate::models::{sort_by_score_desc, ProviderResult, Query};
use async_trait::async_trait;

/// How many candidates are matched between cancellation checks.
pub const CANCEL_CHECK_INTERVAL: usize = 256;

/// A pluggable result source queried for every search text.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier; result id prefix and key in the enabled map.
    fn id(&self) -> &str;

    /// Cheap pre-filter run before `query`. Never performs the match.
    fn can_handle(&self, query: &Query) -> bool;

    /// Match the query against this provider's candidates.
    ///
    /// Results are sorted by descending score. Implementations check
    /// `cancel` periodically and stop early once it is set.
    async fn query(
        &self,
        query: &Query,
        cancel: &CancellationToken,
    ) -> ProviderQueryResult<Vec<ProviderResult>>;
}

/// Sort by descending score (stable) and keep the best `limit`.
pub(crate) fn rank_and_truncate(
    mut results: Vec<ProviderResult>,
    limit: usize,
) -> Vec<ProviderResult> {
    sort_by_score_desc(&mut results);
    results.truncate(limit);
    results
}

/// Cooperative cancellation check every [`CANCEL_CHECK_INTERVAL`] items.
pub(crate) fn check_cancelled(
    position: usize,
    cancel: &CancellationToken,
) -> ProviderQueryResult<()> {
    if position % CANCEL_CHECK_INTERVAL == 0 {
        cancel.check()?;
    }
    Ok(())
}
