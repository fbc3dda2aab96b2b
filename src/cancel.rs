//! Cooperative cancellation shared by query passes and indexing passes.
//!
//! A token is cloned into every task taking part in a pass. Work checks it
//! at defined points and stops on its own; nothing is forcibly interrupted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A cloneable cancellation flag.
///
/// # Example
///
/// ```
/// use omnisearch_mcp_server::cancel::CancellationToken;
///
/// let token = CancellationToken::new();
/// let worker = token.clone();
///
/// token.cancel();
/// assert!(worker.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Return `Err(Cancelled)` once cancellation was requested.
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Marker error for a cancelled operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl std::fmt::Display for Cancelled {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Operation was cancelled")
    }
}

impl std::error::Error for Cancelled {}

impl From<Cancelled> for crate::error::IndexingError {
    fn from(_: Cancelled) -> Self {
        crate::error::IndexingError::Cancelled
    }
}

impl From<Cancelled> for crate::error::ProviderError {
    fn from(_: Cancelled) -> Self {
        crate::error::ProviderError::Cancelled
    }
}
