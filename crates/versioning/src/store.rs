//! The version-store capability: record types, errors, and the store trait.
//!
//! The store is an opaque, append-only collection of immutable version
//! documents keyed by (article id, version number). Implementations must
//! never mutate a persisted record; the only write operations are insert and
//! whole-record deletion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use khub_core::types::{DbId, Timestamp};

/// One media attachment captured by value at snapshot time.
///
/// Holds no reference to live media rows; live media may later change or be
/// deleted without affecting the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSnapshotItem {
    pub url: String,
    pub media_type: String,
    pub description: Option<String>,
}

/// An immutable article version document.
///
/// Captures the article's state **as it existed immediately before the edit
/// that produced this version** (pre-state, not post-state).
#[derive(Debug, Clone, Serialize)]
pub struct VersionRecord {
    /// Store-assigned identity, distinct from the article id.
    pub id: DbId,
    pub article_id: DbId,
    /// Positive, unique per article, strictly increasing in write order.
    pub version_number: i64,
    pub title: String,
    pub content_source: String,
    pub content_rendered: String,
    pub edited_at: Timestamp,
    pub edited_by_user_id: DbId,
    pub media_snapshot: Vec<MediaSnapshotItem>,
}

/// Input for appending a new version document. `edited_at` is stamped by the
/// store.
#[derive(Debug, Clone)]
pub struct NewVersionRecord {
    pub article_id: DbId,
    pub version_number: i64,
    pub title: String,
    pub content_source: String,
    pub content_rendered: String,
    pub edited_by_user_id: DbId,
    pub media_snapshot: Vec<MediaSnapshotItem>,
}

/// Version-store failure modes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The (article id, version number) pair already exists. Retryable: the
    /// caller lost a concurrent allocation race and should re-read and retry.
    #[error("Version conflict: article {article_id} already has version {version_number}")]
    Conflict { article_id: DbId, version_number: i64 },

    /// Any other backend failure.
    #[error("Version store error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Append-only store of immutable article version documents.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Append a version document.
    ///
    /// Implementations must reject duplicate (article id, version number)
    /// pairs with [`StoreError::Conflict`] rather than overwriting.
    async fn insert(&self, record: NewVersionRecord) -> Result<VersionRecord, StoreError>;

    /// Find one version by (article id, version number).
    async fn find(
        &self,
        article_id: DbId,
        version_number: i64,
    ) -> Result<Option<VersionRecord>, StoreError>;

    /// All versions for an article, sorted by edit time descending.
    async fn list_for_article(&self, article_id: DbId) -> Result<Vec<VersionRecord>, StoreError>;

    /// Number of versions stored for an article.
    async fn count_for_article(&self, article_id: DbId) -> Result<i64, StoreError>;

    /// Delete exactly one version by (article id, version number, record id).
    ///
    /// Remaining versions keep their numbers; the sequence may contain gaps
    /// afterwards. Returns `false` if no record matched.
    async fn delete(
        &self,
        article_id: DbId,
        version_number: i64,
        id: DbId,
    ) -> Result<bool, StoreError>;

    /// Delete an article's entire history (bulk article deletion). Returns
    /// the number of records removed.
    async fn delete_all_for_article(&self, article_id: DbId) -> Result<u64, StoreError>;
}
