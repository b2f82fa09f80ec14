//! Repository for the `favorites` table.

use sqlx::PgPool;

use khub_core::types::DbId;

use crate::models::article::ArticleWithMeta;

/// Provides operations for per-user article favorites.
pub struct FavoriteRepo;

impl FavoriteRepo {
    /// Add an article to a user's favorites.
    ///
    /// Returns `false` if it was already favorited.
    pub async fn add(pool: &PgPool, article_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO favorites (article_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_favorites DO NOTHING",
        )
        .bind(article_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove an article from a user's favorites.
    ///
    /// Returns `false` if it was not favorited.
    pub async fn remove(
        pool: &PgPool,
        article_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM favorites WHERE article_id = $1 AND user_id = $2",
        )
        .bind(article_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List a user's favorited articles with metadata, most recently
    /// favorited first.
    pub async fn list_articles_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ArticleWithMeta>, sqlx::Error> {
        let query = "\
            SELECT a.id, a.title, a.content_source, a.content_rendered, a.status, \
                   a.category_id, c.name AS category_name, c.slug AS category_slug, \
                   a.owner_id, u.username AS owner_username, \
                   (SELECT COUNT(*) FROM article_likes l WHERE l.article_id = a.id) AS likes_count, \
                   a.created_at, a.updated_at
            FROM favorites f
            JOIN articles a ON a.id = f.article_id
            JOIN users u ON u.id = a.owner_id
            JOIN categories c ON c.id = a.category_id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC";
        sqlx::query_as::<_, ArticleWithMeta>(query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
