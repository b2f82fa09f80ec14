//! Handlers for article version history.
//!
//! Thin HTTP shims over the versioning engine: listing is open to any
//! authenticated caller, restore requires the article owner, and deleting a
//! snapshot requires the user who made that edit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use khub_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/articles/{id}/versions
///
/// List an article's version history, newest edit first. 404 when the
/// article has no versions.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(article_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let versions = state.engine.list_versions(article_id, auth.user_id).await?;
    Ok(Json(DataResponse { data: versions }))
}

/// POST /api/v1/articles/{id}/versions/{version}/restore
///
/// Overwrite the live article from a historical snapshot. Owner only.
/// No new version record is written for the restore itself.
pub async fn restore(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((article_id, version_number)): Path<(DbId, i64)>,
) -> AppResult<StatusCode> {
    state
        .engine
        .restore(article_id, version_number, auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/articles/{id}/versions/{version}
///
/// Delete a single snapshot. Only the user who made that edit may delete it;
/// remaining version numbers are untouched (gaps allowed).
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((article_id, version_number)): Path<(DbId, i64)>,
) -> AppResult<StatusCode> {
    state
        .engine
        .delete_version(article_id, version_number, auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
