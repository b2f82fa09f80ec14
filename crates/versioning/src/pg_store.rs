//! Postgres-backed version store.
//!
//! Runs on its **own** connection pool (`VERSION_DATABASE_URL`), which may
//! point at a different database than the live store -- nothing here may
//! assume a shared transaction with live-state writes. Version documents are
//! rows with the media snapshot embedded as JSONB.

use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};

use async_trait::async_trait;

use khub_core::types::{DbId, Timestamp};

use crate::store::{MediaSnapshotItem, NewVersionRecord, StoreError, VersionRecord, VersionStore};

/// Column list for `article_versions` queries.
const COLUMNS: &str = "id, article_id, version_number, title, content_source, \
    content_rendered, edited_at, edited_by_user_id, media_snapshot";

/// Raw row shape; `media_snapshot` is decoded from JSONB after the fetch.
#[derive(Debug, FromRow)]
struct VersionRow {
    id: DbId,
    article_id: DbId,
    version_number: i64,
    title: String,
    content_source: String,
    content_rendered: String,
    edited_at: Timestamp,
    edited_by_user_id: DbId,
    media_snapshot: serde_json::Value,
}

impl VersionRow {
    fn into_record(self) -> Result<VersionRecord, StoreError> {
        let media_snapshot: Vec<MediaSnapshotItem> = serde_json::from_value(self.media_snapshot)
            .map_err(|e| StoreError::Backend(sqlx::Error::Decode(Box::new(e))))?;
        Ok(VersionRecord {
            id: self.id,
            article_id: self.article_id,
            version_number: self.version_number,
            title: self.title,
            content_source: self.content_source,
            content_rendered: self.content_rendered,
            edited_at: self.edited_at,
            edited_by_user_id: self.edited_by_user_id,
            media_snapshot,
        })
    }
}

/// Postgres implementation of [`VersionStore`].
#[derive(Clone)]
pub struct PgVersionStore {
    pool: PgPool,
}

impl PgVersionStore {
    /// Connect to the version store database and run its migrations.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;
        let store = Self::from_pool(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Wrap an existing pool (used by tests that share one database).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run pending version-store migrations.
    ///
    /// Unknown applied versions are ignored so the version store can share a
    /// database with the live store in small deployments.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        let mut migrator = sqlx::migrate!("./migrations");
        migrator.set_ignore_missing(true);
        migrator.run(&self.pool).await
    }
}

#[async_trait]
impl VersionStore for PgVersionStore {
    async fn insert(&self, record: NewVersionRecord) -> Result<VersionRecord, StoreError> {
        let snapshot_json = serde_json::to_value(&record.media_snapshot)
            .map_err(|e| StoreError::Backend(sqlx::Error::Encode(Box::new(e))))?;

        let query = format!(
            "INSERT INTO article_versions
                (article_id, version_number, title, content_source, content_rendered,
                 edited_by_user_id, media_snapshot)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, VersionRow>(&query)
            .bind(record.article_id)
            .bind(record.version_number)
            .bind(&record.title)
            .bind(&record.content_source)
            .bind(&record.content_rendered)
            .bind(record.edited_by_user_id)
            .bind(snapshot_json)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify_insert_error(e, record.article_id, record.version_number))?;

        row.into_record()
    }

    async fn find(
        &self,
        article_id: DbId,
        version_number: i64,
    ) -> Result<Option<VersionRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM article_versions
             WHERE article_id = $1 AND version_number = $2"
        );
        let row = sqlx::query_as::<_, VersionRow>(&query)
            .bind(article_id)
            .bind(version_number)
            .fetch_optional(&self.pool)
            .await?;
        row.map(VersionRow::into_record).transpose()
    }

    async fn list_for_article(&self, article_id: DbId) -> Result<Vec<VersionRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM article_versions
             WHERE article_id = $1
             ORDER BY edited_at DESC, version_number DESC"
        );
        let rows = sqlx::query_as::<_, VersionRow>(&query)
            .bind(article_id)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(VersionRow::into_record).collect()
    }

    async fn count_for_article(&self, article_id: DbId) -> Result<i64, StoreError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM article_versions WHERE article_id = $1")
                .bind(article_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    async fn delete(
        &self,
        article_id: DbId,
        version_number: i64,
        id: DbId,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "DELETE FROM article_versions
             WHERE article_id = $1 AND version_number = $2 AND id = $3",
        )
        .bind(article_id)
        .bind(version_number)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_for_article(&self, article_id: DbId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM article_versions WHERE article_id = $1")
            .bind(article_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Map a unique-constraint violation on (article_id, version_number) to the
/// retryable [`StoreError::Conflict`]; pass everything else through.
fn classify_insert_error(err: sqlx::Error, article_id: DbId, version_number: i64) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // PostgreSQL unique constraint violation: error code 23505.
        if db_err.code().as_deref() == Some("23505")
            && db_err.constraint() == Some("uq_article_versions_number")
        {
            return StoreError::Conflict {
                article_id,
                version_number,
            };
        }
    }
    StoreError::Backend(err)
}
