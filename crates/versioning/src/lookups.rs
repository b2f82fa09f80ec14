//! Injected lookup capabilities for identity and category resolution.
//!
//! The engine consumes these as opaque interfaces and converts `None` to an
//! explicit NotFound at the call site, so no nullable result is threaded
//! through the orchestration flow.

use async_trait::async_trait;
use sqlx::PgPool;

use khub_core::types::DbId;
use khub_db::repositories::{CategoryRepo, UserRepo};

/// Lookup-only view of the user directory.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a user id to a display name; `None` if no such user.
    async fn display_name(&self, user_id: DbId) -> Result<Option<String>, sqlx::Error>;
}

/// A resolved category reference.
#[derive(Debug, Clone)]
pub struct CategoryRef {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// Case-insensitive category slug resolution.
#[async_trait]
pub trait CategoryResolver: Send + Sync {
    /// Resolve a slug to a category; `None` if no such category.
    async fn resolve_slug(&self, slug: &str) -> Result<Option<CategoryRef>, sqlx::Error>;
}

/// [`IdentityProvider`] backed by the live store's `users` table.
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn display_name(&self, user_id: DbId) -> Result<Option<String>, sqlx::Error> {
        let user = UserRepo::find_by_id(&self.pool, user_id).await?;
        Ok(user.map(|u| u.username))
    }
}

/// [`CategoryResolver`] backed by the live store's `categories` table.
pub struct PgCategoryResolver {
    pool: PgPool,
}

impl PgCategoryResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryResolver for PgCategoryResolver {
    async fn resolve_slug(&self, slug: &str) -> Result<Option<CategoryRef>, sqlx::Error> {
        let category = CategoryRepo::find_by_slug(&self.pool, slug).await?;
        Ok(category.map(|c| CategoryRef {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }))
    }
}
