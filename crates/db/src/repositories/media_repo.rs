//! Repository for the `media_items` table.

use sqlx::PgPool;

use khub_core::types::DbId;

use crate::models::media::{CreateMedia, Media};

/// Column list for `media_items` queries.
const COLUMNS: &str = "id, article_id, url, media_type, description, position, created_at";

/// Provides operations for live media attachments.
pub struct MediaRepo;

impl MediaRepo {
    /// Insert a single media row.
    pub async fn create(
        pool: &PgPool,
        article_id: DbId,
        input: &CreateMedia,
    ) -> Result<Media, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_items (article_id, url, media_type, description, position)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(article_id)
            .bind(&input.url)
            .bind(&input.media_type)
            .bind(&input.description)
            .bind(input.position)
            .fetch_one(pool)
            .await
    }

    /// Find a media row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Media>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM media_items WHERE id = $1");
        sqlx::query_as::<_, Media>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an article's media in attachment order.
    pub async fn list_by_article(
        pool: &PgPool,
        article_id: DbId,
    ) -> Result<Vec<Media>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media_items
             WHERE article_id = $1
             ORDER BY position ASC, id ASC"
        );
        sqlx::query_as::<_, Media>(&query)
            .bind(article_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a single media row. Returns the number of rows deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media_items WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
