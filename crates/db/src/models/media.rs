//! Media attachment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use khub_core::types::{DbId, Timestamp};

/// A row from the `media_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Media {
    pub id: DbId,
    pub article_id: DbId,
    pub url: String,
    pub media_type: String,
    pub description: Option<String>,
    pub position: i32,
    pub created_at: Timestamp,
}

/// DTO for inserting a media row.
///
/// `position` preserves the client-supplied ordering; the live media list is
/// always replaced wholesale, so positions are dense per write.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMedia {
    pub url: String,
    pub media_type: String,
    pub description: Option<String>,
    pub position: i32,
}
