//! Category entity model.

use serde::Serialize;
use sqlx::FromRow;

use khub_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
}
