//! Repository for the `articles` table.
//!
//! Holds live article state only. Version snapshots are written by the
//! versioning crate into its own store; the single point of contact here is
//! [`ArticleRepo::allocate_version_number`], which advances the per-article
//! `version_seq` counter atomically.

use sqlx::PgPool;

use khub_core::types::DbId;

use crate::models::article::{Article, ArticleContent, ArticleWithMeta, CreateArticle};

/// Column list for plain `articles` queries.
const COLUMNS: &str = "id, title, content_source, content_rendered, status, \
    category_id, owner_id, version_seq, created_at, updated_at";

/// Column list for joined article + owner + category + like-count queries.
const META_COLUMNS: &str = "\
    a.id, a.title, a.content_source, a.content_rendered, a.status, \
    a.category_id, c.name AS category_name, c.slug AS category_slug, \
    a.owner_id, u.username AS owner_username, \
    (SELECT COUNT(*) FROM article_likes l WHERE l.article_id = a.id) AS likes_count, \
    a.created_at, a.updated_at";

/// Shared FROM clause for joined queries.
const META_FROM: &str = "FROM articles a \
    JOIN users u ON u.id = a.owner_id \
    JOIN categories c ON c.id = a.category_id";

/// Provides CRUD operations for live articles.
pub struct ArticleRepo;

impl ArticleRepo {
    /// Insert a new article row.
    pub async fn create(pool: &PgPool, input: &CreateArticle) -> Result<Article, sqlx::Error> {
        let query = format!(
            "INSERT INTO articles
                (title, content_source, content_rendered, status, category_id, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Article>(&query)
            .bind(&input.title)
            .bind(&input.content_source)
            .bind(&input.content_rendered)
            .bind(&input.status)
            .bind(input.category_id)
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find an article by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Article>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM articles WHERE id = $1");
        sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an article with owner/category metadata.
    pub async fn find_with_meta(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ArticleWithMeta>, sqlx::Error> {
        let query = format!("SELECT {META_COLUMNS} {META_FROM} WHERE a.id = $1");
        sqlx::query_as::<_, ArticleWithMeta>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published article by its owner's username and exact title.
    pub async fn find_by_owner_and_title(
        pool: &PgPool,
        username: &str,
        title: &str,
    ) -> Result<Option<ArticleWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} {META_FROM}
             WHERE u.username = $1 AND a.title = $2 AND a.status = 'published'"
        );
        sqlx::query_as::<_, ArticleWithMeta>(&query)
            .bind(username)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// List all published articles, newest first.
    pub async fn list_published(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ArticleWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} {META_FROM}
             WHERE a.status = 'published'
             ORDER BY a.created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ArticleWithMeta>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List all of an owner's articles regardless of status, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<ArticleWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} {META_FROM}
             WHERE a.owner_id = $1
             ORDER BY a.created_at DESC"
        );
        sqlx::query_as::<_, ArticleWithMeta>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List a user's published articles, newest first.
    pub async fn list_published_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<ArticleWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} {META_FROM}
             WHERE a.owner_id = $1 AND a.status = 'published'
             ORDER BY a.created_at DESC"
        );
        sqlx::query_as::<_, ArticleWithMeta>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List published articles in a category, newest first.
    pub async fn list_published_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<ArticleWithMeta>, sqlx::Error> {
        let query = format!(
            "SELECT {META_COLUMNS} {META_FROM}
             WHERE a.category_id = $1 AND a.status = 'published'
             ORDER BY a.created_at DESC"
        );
        sqlx::query_as::<_, ArticleWithMeta>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// ILIKE search over title and content of published articles.
    pub async fn search_published(
        pool: &PgPool,
        term: &str,
        limit: i64,
    ) -> Result<Vec<ArticleWithMeta>, sqlx::Error> {
        let pattern = format!("%{term}%");
        let query = format!(
            "SELECT {META_COLUMNS} {META_FROM}
             WHERE a.status = 'published'
               AND (a.title ILIKE $1 OR a.content_source ILIKE $1)
             ORDER BY a.created_at DESC
             LIMIT $2"
        );
        sqlx::query_as::<_, ArticleWithMeta>(&query)
            .bind(&pattern)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Atomically advance and return the article's version counter.
    ///
    /// Concurrent callers observe distinct values; there is no read-then-write
    /// window. Returns `None` if the article does not exist.
    pub async fn allocate_version_number(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE articles SET version_seq = version_seq + 1
             WHERE id = $1
             RETURNING version_seq",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(seq,)| seq))
    }

    /// Apply full replacement content and media in one live-store transaction.
    ///
    /// The media list is replaced wholesale (delete + insert), never merged.
    /// `updated_at` is stamped by the statement. Returns `None` if the
    /// article does not exist.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &ArticleContent,
    ) -> Result<Option<Article>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE articles SET
                title = $2,
                content_source = $3,
                content_rendered = $4,
                status = $5,
                category_id = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let article = sqlx::query_as::<_, Article>(&query)
            .bind(id)
            .bind(&content.title)
            .bind(&content.content_source)
            .bind(&content.content_rendered)
            .bind(&content.status)
            .bind(content.category_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(article) = article else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("DELETE FROM media_items WHERE article_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for item in &content.media_items {
            sqlx::query(
                "INSERT INTO media_items (article_id, url, media_type, description, position)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(&item.url)
            .bind(&item.media_type)
            .bind(&item.description)
            .bind(item.position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(article))
    }

    /// Delete an article. Live media/comments/likes/favorites cascade via FK;
    /// version history does not (the engine cleans it up separately).
    ///
    /// Returns the number of rows deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Record a like. Returns `false` if the user already liked the article.
    pub async fn like(pool: &PgPool, article_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO article_likes (article_id, user_id)
             VALUES ($1, $2)
             ON CONFLICT ON CONSTRAINT uq_article_likes DO NOTHING",
        )
        .bind(article_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a like. Returns `false` if no like existed.
    pub async fn unlike(
        pool: &PgPool,
        article_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM article_likes WHERE article_id = $1 AND user_id = $2",
        )
        .bind(article_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
