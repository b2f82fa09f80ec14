//! Handlers for per-user article favorites.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use khub_core::error::CoreError;
use khub_core::types::DbId;
use khub_db::repositories::FavoriteRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::articles::{attach_media, ensure_article};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/favorites
///
/// The caller's favorited articles, most recently favorited first.
/// 404 when the list is empty.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let articles = FavoriteRepo::list_articles_for_user(&state.pool, auth.user_id).await?;
    if articles.is_empty() {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Favorite",
            key: format!("user {}", auth.user_id),
        }));
    }

    let views = attach_media(&state.pool, articles).await?;
    Ok(Json(DataResponse { data: views }))
}

/// POST /api/v1/articles/{id}/favorite
pub async fn add(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(article_id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_article(&state.pool, article_id).await?;

    let inserted = FavoriteRepo::add(&state.pool, article_id, auth.user_id).await?;
    if !inserted {
        return Err(AppError::Core(CoreError::Conflict(
            "Article is already in favorites".into(),
        )));
    }

    tracing::info!(user_id = auth.user_id, article_id, "Favorite added");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/articles/{id}/favorite
pub async fn remove(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(article_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = FavoriteRepo::remove(&state.pool, article_id, auth.user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Favorite",
            key: format!("article {article_id}"),
        }));
    }

    tracing::info!(user_id = auth.user_id, article_id, "Favorite removed");
    Ok(StatusCode::NO_CONTENT)
}
