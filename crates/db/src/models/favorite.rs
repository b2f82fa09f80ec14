//! Favorite entity model.

use serde::Serialize;
use sqlx::FromRow;

use khub_core::types::{DbId, Timestamp};

/// A row from the `favorites` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Favorite {
    pub id: DbId,
    pub article_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}
