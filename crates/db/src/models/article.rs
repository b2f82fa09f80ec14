//! Article entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use khub_core::types::{DbId, Timestamp};

use crate::models::media::{CreateMedia, Media};

/// A row from the `articles` table (live state only).
///
/// `version_seq` is the per-article monotonic version allocator; it is
/// advanced by the versioning engine, never by normal CRUD writes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Article {
    pub id: DbId,
    pub title: String,
    pub content_source: String,
    pub content_rendered: String,
    pub status: String,
    pub category_id: DbId,
    pub owner_id: DbId,
    pub version_seq: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An article row joined with owner/category names and its like count.
///
/// Produced by the list/detail queries; media is attached separately to
/// build an [`ArticleView`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArticleWithMeta {
    pub id: DbId,
    pub title: String,
    pub content_source: String,
    pub content_rendered: String,
    pub status: String,
    pub category_id: DbId,
    pub category_name: String,
    pub category_slug: String,
    pub owner_id: DbId,
    pub owner_username: String,
    pub likes_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full article view returned by the API: joined metadata plus the ordered
/// live media list.
#[derive(Debug, Clone, Serialize)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: ArticleWithMeta,
    pub media_items: Vec<Media>,
}

/// DTO for inserting a new article row.
///
/// `content_rendered` is derived from `content_source` by the caller; the
/// repository stores both verbatim.
#[derive(Debug)]
pub struct CreateArticle {
    pub title: String,
    pub content_source: String,
    pub content_rendered: String,
    pub status: String,
    pub category_id: DbId,
    pub owner_id: DbId,
}

/// Full replacement content for an article's mutable fields.
///
/// Applied together with a wholesale media-list replacement in a single
/// live-store transaction (see `ArticleRepo::update_content`). Used by both
/// the versioned-update and the restore paths.
#[derive(Debug)]
pub struct ArticleContent {
    pub title: String,
    pub content_source: String,
    pub content_rendered: String,
    pub status: String,
    pub category_id: DbId,
    pub media_items: Vec<CreateMedia>,
}

/// Request body for creating an article through the API.
#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub content_source: String,
    /// Parsed against the status enumerants; defaults to draft.
    pub status: Option<String>,
    pub category_slug: String,
    #[serde(default)]
    pub media_items: Vec<MediaItemRequest>,
}

/// Request body for the versioned article update.
#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    pub title: String,
    pub content_source: String,
    pub status: String,
    pub category_slug: String,
    #[serde(default)]
    pub media_items: Vec<MediaItemRequest>,
}

/// One media attachment as supplied by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaItemRequest {
    pub url: String,
    pub media_type: String,
    pub description: Option<String>,
}
