//! Comment entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use khub_core::types::{DbId, Timestamp};

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub article_id: DbId,
    pub user_id: DbId,
    pub text: String,
    pub parent_comment_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// A comment row joined with its author name, like count, and whether the
/// requesting viewer liked it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithMeta {
    pub id: DbId,
    pub article_id: DbId,
    pub user_id: DbId,
    pub text: String,
    pub parent_comment_id: Option<DbId>,
    pub created_at: Timestamp,
    pub created_by: String,
    pub likes_count: i64,
    pub viewer_liked: bool,
}

/// Threaded comment view: a top-level comment and its direct replies.
#[derive(Debug, Clone, Serialize)]
pub struct CommentThread {
    #[serde(flatten)]
    pub comment: CommentWithMeta,
    pub replies: Vec<CommentWithMeta>,
}

/// Request body for creating a comment.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
    pub parent_comment_id: Option<DbId>,
}
