//! Per-article write serialization.
//!
//! The snapshot-then-mutate sequence in the engine is not atomic across the
//! two stores, so concurrent edits to the same article must be serialized.
//! This registry hands out one async mutex per article id; distinct articles
//! never contend. The version store's unique constraint remains in place for
//! writers outside this process.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use khub_core::types::DbId;

/// Registry of per-article mutexes.
///
/// Guard entries are a few bytes each and are retained for the life of the
/// process; the map is bounded by the number of distinct articles edited.
#[derive(Default)]
pub struct ArticleLocks {
    inner: Mutex<HashMap<DbId, Arc<Mutex<()>>>>,
}

impl ArticleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the write lock for an article, waiting if another task holds
    /// it. The lock is released when the returned guard drops.
    pub async fn acquire(&self, article_id: DbId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(map.entry(article_id).or_default())
        };
        lock.lock_owned().await
    }
}
