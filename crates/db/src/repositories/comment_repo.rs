//! Repository for the `comments` and `comment_likes` tables.

use sqlx::PgPool;

use khub_core::types::DbId;

use crate::models::comment::{Comment, CommentWithMeta};

/// Column list for plain `comments` queries.
const COLUMNS: &str = "id, article_id, user_id, text, parent_comment_id, created_at";

/// Column list for comment + author + like metadata queries. `$viewer` is
/// always bound as the first parameter.
const META_COLUMNS: &str = "\
    co.id, co.article_id, co.user_id, co.text, co.parent_comment_id, co.created_at, \
    u.username AS created_by, \
    (SELECT COUNT(*) FROM comment_likes cl WHERE cl.comment_id = co.id) AS likes_count, \
    EXISTS(SELECT 1 FROM comment_likes cl WHERE cl.comment_id = co.id AND cl.user_id = $1) \
        AS viewer_liked";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment or reply.
    pub async fn create(
        pool: &PgPool,
        article_id: DbId,
        user_id: DbId,
        text: &str,
        parent_comment_id: Option<DbId>,
    ) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (article_id, user_id, text, parent_comment_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(article_id)
            .bind(user_id)
            .bind(text)
            .bind(parent_comment_id)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all comments on an article (top-level and replies), oldest first,
    /// with author names and like metadata relative to `viewer_id`.
    ///
    /// Threading into parent/reply structure is done by the caller.
    pub async fn list_by_article(
        pool: &PgPool,
        article_id: DbId,
        viewer_id: DbId,
    ) -> Result<Vec<CommentWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS}
             FROM comments co
             JOIN users u ON u.id = co.user_id
             WHERE co.article_id = $2
             ORDER BY co.created_at ASC, co.id ASC"
        );
        sqlx::query_as::<_, CommentWithMeta>(&query)
            .bind(viewer_id)
            .bind(article_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a comment. Replies cascade via FK.
    ///
    /// Returns the number of rows deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Record a like. Returns `false` if the user already liked the comment.
    pub async fn like(pool: &PgPool, comment_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO comment_likes (comment_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_comment_likes DO NOTHING",
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a like. Returns `false` if no like existed.
    pub async fn unlike(
        pool: &PgPool,
        comment_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM comment_likes WHERE comment_id = $1 AND user_id = $2",
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
