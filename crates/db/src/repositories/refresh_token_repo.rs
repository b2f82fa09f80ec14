//! Repository for the `refresh_tokens` table.
//!
//! Stores only SHA-256 digests of refresh tokens; a database leak does not
//! compromise active sessions.

use sqlx::PgPool;

use khub_core::types::{DbId, Timestamp};

use crate::models::refresh_token::RefreshToken;

/// Column list for `refresh_tokens` queries.
const COLUMNS: &str = "id, user_id, token_hash, expires_at, revoked_at, created_at";

/// Provides operations for refresh-token sessions.
pub struct RefreshTokenRepo;

impl RefreshTokenRepo {
    /// Persist a new refresh-token hash for a user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<RefreshToken, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a token by hash that is neither revoked nor expired.
    pub async fn find_active_by_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM refresh_tokens
             WHERE token_hash = $1
               AND revoked_at IS NULL
               AND expires_at > NOW()"
        );
        sqlx::query_as::<_, RefreshToken>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a token by hash. Returns `false` if no active token matched.
    pub async fn revoke_by_hash(pool: &PgPool, token_hash: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW()
             WHERE token_hash = $1 AND revoked_at IS NULL",
        )
        .bind(token_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Revoke every active token belonging to a user.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW()
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
