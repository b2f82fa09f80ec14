//! Versioning engine: snapshot-on-update, restore, history listing, and
//! single-snapshot deletion.
//!
//! The engine coordinates the live article store (relational, transactional)
//! and the version store (append-only documents) with **no** cross-store
//! transaction. Ordering is fixed: snapshot first, mutate live state second.
//! If the process dies between the two writes the result is an orphaned
//! version record -- an over-counted but harmless history entry; the reverse
//! ordering would silently lose history.
//!
//! Version numbers come from the per-article `version_seq` counter on the
//! live row, advanced atomically (`UPDATE ... RETURNING`), not from a
//! count-of-rows query. Writes to one article are additionally serialized by
//! [`ArticleLocks`], and the store's unique constraint on
//! (article id, version number) turns any residual collision into a
//! retryable conflict.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;

use khub_core::article::{
    validate_content, validate_media_description, validate_media_url, validate_title,
    ArticleStatus, MediaType,
};
use khub_core::error::CoreError;
use khub_core::markup::render_markup;
use khub_core::types::{DbId, Timestamp};
use khub_db::models::article::{
    Article, ArticleContent, ArticleView, MediaItemRequest, UpdateArticleRequest,
};
use khub_db::models::media::CreateMedia;
use khub_db::repositories::{ArticleRepo, MediaRepo};

use crate::locks::ArticleLocks;
use crate::lookups::{CategoryResolver, IdentityProvider};
use crate::snapshot::{materialize_media, snapshot_media};
use crate::store::{MediaSnapshotItem, NewVersionRecord, StoreError, VersionStore};

/// Failures surfaced by engine operations.
///
/// None of these are retried internally; a [`StoreError::Conflict`] is the
/// caller's signal to retry the whole operation.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Live store error: {0}")]
    LiveStore(#[from] sqlx::Error),
}

/// One entry in an article's version history as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct VersionSummary {
    pub id: DbId,
    pub article_id: DbId,
    pub version_number: i64,
    pub title: String,
    pub content_rendered: String,
    pub edited_at: Timestamp,
    /// Resolved display name of the user who made the edit.
    pub edited_by: String,
    pub media_items: Vec<MediaSnapshotItem>,
}

/// Orchestrates article versioning across the live and version stores.
pub struct VersioningEngine {
    live: PgPool,
    versions: Arc<dyn VersionStore>,
    identity: Arc<dyn IdentityProvider>,
    categories: Arc<dyn CategoryResolver>,
    locks: ArticleLocks,
}

impl VersioningEngine {
    pub fn new(
        live: PgPool,
        versions: Arc<dyn VersionStore>,
        identity: Arc<dyn IdentityProvider>,
        categories: Arc<dyn CategoryResolver>,
    ) -> Self {
        Self {
            live,
            versions,
            identity,
            categories,
            locks: ArticleLocks::new(),
        }
    }

    /// Apply an edit to an article, snapshotting its pre-edit state first.
    ///
    /// Exactly one immutable version record is appended per successful call.
    /// Authorization is enforced here, not upstream: the snapshot-then-mutate
    /// sequence must never run for a non-owner.
    pub async fn update(
        &self,
        article_id: DbId,
        editor_user_id: DbId,
        input: &UpdateArticleRequest,
    ) -> Result<ArticleView, EngineError> {
        validate_title(&input.title)?;
        validate_content(&input.content_source)?;
        let status = ArticleStatus::parse(&input.status)?;
        let media_items = parse_media_items(&input.media_items)?;

        let category = self
            .categories
            .resolve_slug(&input.category_slug)
            .await?
            .ok_or_else(|| CoreError::NotFoundByKey {
                entity: "Category",
                key: input.category_slug.clone(),
            })?;

        let _guard = self.locks.acquire(article_id).await;

        let article = self.load_owned_article(article_id, editor_user_id).await?;

        // Capture pre-edit state while the live row is still untouched.
        let live_media = MediaRepo::list_by_article(&self.live, article_id).await?;
        let media_snapshot = snapshot_media(&live_media);

        let version_number = ArticleRepo::allocate_version_number(&self.live, article_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Article",
                id: article_id,
            })?;

        // Snapshot before mutating: a failure past this point leaves an
        // orphaned version record, never missing history.
        self.versions
            .insert(NewVersionRecord {
                article_id,
                version_number,
                title: article.title.clone(),
                content_source: article.content_source.clone(),
                content_rendered: article.content_rendered.clone(),
                edited_by_user_id: editor_user_id,
                media_snapshot,
            })
            .await?;

        let content = ArticleContent {
            title: input.title.clone(),
            content_source: input.content_source.clone(),
            content_rendered: render_markup(&input.content_source),
            status: status.as_str().to_string(),
            category_id: category.id,
            media_items,
        };
        ArticleRepo::update_content(&self.live, article_id, &content)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Article",
                id: article_id,
            })?;

        tracing::info!(
            article_id,
            version_number,
            editor_user_id,
            "Article updated; pre-edit snapshot persisted"
        );

        self.fetch_view(article_id).await
    }

    /// Overwrite an article's live content from a historical snapshot.
    ///
    /// Restoring is a live-state overwrite, not a versioned edit: no new
    /// version record is written and the version counter does not advance,
    /// so a restore cannot itself be undone via history.
    pub async fn restore(
        &self,
        article_id: DbId,
        version_number: i64,
        requester_user_id: DbId,
    ) -> Result<bool, EngineError> {
        let _guard = self.locks.acquire(article_id).await;

        let article = self
            .load_owned_article(article_id, requester_user_id)
            .await?;

        let version = self
            .versions
            .find(article_id, version_number)
            .await?
            .ok_or_else(|| version_not_found(article_id, version_number))?;

        let content = ArticleContent {
            title: version.title,
            content_source: version.content_source,
            content_rendered: version.content_rendered,
            // Status and category are not part of the snapshot; keep current.
            status: article.status,
            category_id: article.category_id,
            media_items: materialize_media(&version.media_snapshot),
        };
        ArticleRepo::update_content(&self.live, article_id, &content)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Article",
                id: article_id,
            })?;

        tracing::info!(
            article_id,
            version_number,
            requester_user_id,
            "Article restored from snapshot"
        );

        Ok(true)
    }

    /// List an article's version history, newest edit first.
    ///
    /// Any authenticated caller may browse history; ownership is only
    /// required for write paths. Zero versions is reported as NotFound.
    pub async fn list_versions(
        &self,
        article_id: DbId,
        requester_user_id: DbId,
    ) -> Result<Vec<VersionSummary>, EngineError> {
        self.identity
            .display_name(requester_user_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: requester_user_id,
            })?;

        let records = self.versions.list_for_article(article_id).await?;
        if records.is_empty() {
            return Err(version_history_not_found(article_id).into());
        }

        // Resolve each distinct editor once; a deleted editor keeps the
        // history entry readable.
        let mut names: HashMap<DbId, String> = HashMap::new();
        for record in &records {
            if !names.contains_key(&record.edited_by_user_id) {
                let name = self
                    .identity
                    .display_name(record.edited_by_user_id)
                    .await?
                    .unwrap_or_else(|| "deleted user".to_string());
                names.insert(record.edited_by_user_id, name);
            }
        }

        Ok(records
            .into_iter()
            .map(|record| {
                let edited_by = names
                    .get(&record.edited_by_user_id)
                    .cloned()
                    .unwrap_or_default();
                VersionSummary {
                    id: record.id,
                    article_id: record.article_id,
                    version_number: record.version_number,
                    title: record.title,
                    content_rendered: record.content_rendered,
                    edited_at: record.edited_at,
                    edited_by,
                    media_items: record.media_snapshot,
                }
            })
            .collect())
    }

    /// Delete a single version snapshot.
    ///
    /// Only the user who made that edit may delete it -- a version is
    /// attributable to its editor, not to the article's current owner.
    /// Remaining versions are never renumbered; gaps are expected.
    pub async fn delete_version(
        &self,
        article_id: DbId,
        version_number: i64,
        requester_user_id: DbId,
    ) -> Result<bool, EngineError> {
        let version = self
            .versions
            .find(article_id, version_number)
            .await?
            .ok_or_else(|| version_not_found(article_id, version_number))?;

        if version.edited_by_user_id != requester_user_id {
            return Err(CoreError::Forbidden(
                "Only the author of a version can delete it".into(),
            )
            .into());
        }

        let deleted = self
            .versions
            .delete(article_id, version_number, version.id)
            .await?;

        if deleted {
            tracing::info!(
                article_id,
                version_number,
                requester_user_id,
                "Version snapshot deleted"
            );
        }
        Ok(deleted)
    }

    /// Synchronously remove an article's entire version history.
    ///
    /// Called by article deletion so history does not linger as orphans.
    pub async fn delete_history(&self, article_id: DbId) -> Result<u64, EngineError> {
        let removed = self.versions.delete_all_for_article(article_id).await?;
        if removed > 0 {
            tracing::info!(article_id, removed, "Version history deleted");
        }
        Ok(removed)
    }

    /// Load an article and verify the requester owns it.
    ///
    /// The Forbidden check runs before any snapshot or mutation; failed
    /// authorization leaves both stores untouched.
    async fn load_owned_article(
        &self,
        article_id: DbId,
        user_id: DbId,
    ) -> Result<Article, EngineError> {
        let article = ArticleRepo::find_by_id(&self.live, article_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Article",
                id: article_id,
            })?;
        if article.owner_id != user_id {
            return Err(CoreError::Forbidden(
                "Only the article owner can modify it".into(),
            )
            .into());
        }
        Ok(article)
    }

    /// Assemble the joined live view returned by `update`.
    async fn fetch_view(&self, article_id: DbId) -> Result<ArticleView, EngineError> {
        let article = ArticleRepo::find_with_meta(&self.live, article_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Article",
                id: article_id,
            })?;
        let media_items = MediaRepo::list_by_article(&self.live, article_id).await?;
        Ok(ArticleView {
            article,
            media_items,
        })
    }
}

/// Parse and validate client-supplied media items into insertable rows.
pub fn parse_media_items(items: &[MediaItemRequest]) -> Result<Vec<CreateMedia>, CoreError> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            validate_media_url(&item.url)?;
            if let Some(description) = &item.description {
                validate_media_description(description)?;
            }
            let media_type = MediaType::parse(&item.media_type)?;
            Ok(CreateMedia {
                url: item.url.clone(),
                media_type: media_type.as_str().to_string(),
                description: item.description.clone(),
                position: position as i32,
            })
        })
        .collect()
}

fn version_not_found(article_id: DbId, version_number: i64) -> CoreError {
    CoreError::NotFoundByKey {
        entity: "ArticleVersion",
        key: format!("article {article_id}, version {version_number}"),
    }
}

fn version_history_not_found(article_id: DbId) -> CoreError {
    CoreError::NotFoundByKey {
        entity: "ArticleVersion",
        key: format!("article {article_id}"),
    }
}
