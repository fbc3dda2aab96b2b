//! Time-bound snapshot of a provider's candidate list.
//!
//! A provider loads its candidates once, shares the snapshot with every
//! concurrent query through an `Arc`, and reloads after the TTL passes or
//! after an explicit invalidation.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug)]
struct Snapshot<T> {
    items: Arc<Vec<T>>,
    loaded_at: Instant,
}

/// A single-slot cache holding a shared candidate list with a TTL.
///
/// Cloning is cheap and clones share the same slot. Concurrent misses are
/// collapsed: the loader runs under the write lock and late arrivals reuse
/// its result.
#[derive(Debug)]
pub struct CandidateCache<T> {
    slot: Arc<RwLock<Option<Snapshot<T>>>>,
    ttl: Duration,
}

impl<T> Clone for CandidateCache<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            ttl: self.ttl,
        }
    }
}

impl<T> CandidateCache<T> {
    /// Create an empty cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(RwLock::new(None)),
            ttl,
        }
    }

    /// Return the cached snapshot, loading it first if missing or stale.
    ///
    /// The boolean is `true` when the snapshot came from the cache. A failed
    /// load leaves any previous (stale) snapshot in place.
    pub async fn get_or_load<F, Fut, E>(&self, loader: F) -> Result<(Arc<Vec<T>>, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        {
            let slot = self.slot.read().await;
            if let Some(snapshot) = slot.as_ref() {
                if snapshot.loaded_at.elapsed() < self.ttl {
                    return Ok((snapshot.items.clone(), true));
                }
            }
        }

        let mut slot = self.slot.write().await;
        if let Some(snapshot) = slot.as_ref() {
            if snapshot.loaded_at.elapsed() < self.ttl {
                return Ok((snapshot.items.clone(), true));
            }
        }

        let items = Arc::new(loader().await?);
        *slot = Some(Snapshot {
            items: items.clone(),
            loaded_at: Instant::now(),
        });
        Ok((items, false))
    }

    /// Drop the snapshot so the next lookup reloads.
    pub async fn invalidate(&self) {
        *self.slot.write().await = None;
    }

    /// True when a fresh snapshot is held.
    pub async fn is_fresh(&self) -> bool {
        self.slot
            .read()
            .await
            .as_ref()
            .is_some_and(|s| s.loaded_at.elapsed() < self.ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
