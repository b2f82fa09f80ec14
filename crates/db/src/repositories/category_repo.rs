//! Repository for the `categories` table.
//!
//! Category rows are seeded externally; this repo is lookup-only.

use sqlx::PgPool;

use khub_core::types::DbId;

use crate::models::category::Category;

/// Column list for `categories` queries.
const COLUMNS: &str = "id, name, slug, created_at";

/// Provides lookup operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Find a category by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by slug, case-insensitively.
    pub async fn find_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE LOWER(slug) = LOWER($1)");
        sqlx::query_as::<_, Category>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }
}
