//! Handlers for article comments and comment likes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use khub_core::article::validate_comment_text;
use khub_core::error::CoreError;
use khub_core::types::DbId;
use khub_db::models::comment::{Comment, CommentThread, CreateCommentRequest};
use khub_db::repositories::CommentRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::articles::ensure_article;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/articles/{id}/comments
///
/// Threaded comments for an article, oldest first. Public; like metadata is
/// personalized when the caller is authenticated.
pub async fn list_by_article(
    auth: Option<AuthUser>,
    State(state): State<AppState>,
    Path(article_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_article(&state.pool, article_id).await?;

    // Viewer id 0 matches no likes, which is what anonymous callers want.
    let viewer_id = auth.map(|a| a.user_id).unwrap_or(0);
    let rows = CommentRepo::list_by_article(&state.pool, article_id, viewer_id).await?;

    // Thread: top-level comments in order, each with its direct replies.
    let (top, replies): (Vec<_>, Vec<_>) = rows
        .into_iter()
        .partition(|c| c.parent_comment_id.is_none());
    let threads: Vec<CommentThread> = top
        .into_iter()
        .map(|comment| {
            let replies = replies
                .iter()
                .filter(|r| r.parent_comment_id == Some(comment.id))
                .cloned()
                .collect();
            CommentThread { comment, replies }
        })
        .collect();

    Ok(Json(DataResponse { data: threads }))
}

/// POST /api/v1/articles/{id}/comments
///
/// Create a comment or a reply (one level deep).
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(article_id): Path<DbId>,
    Json(input): Json<CreateCommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    validate_comment_text(&input.text).map_err(AppError::Core)?;
    ensure_article(&state.pool, article_id).await?;

    if let Some(parent_id) = input.parent_comment_id {
        let parent = CommentRepo::find_by_id(&state.pool, parent_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Comment",
                id: parent_id,
            }))?;
        if parent.article_id != article_id {
            return Err(AppError::Core(CoreError::Validation(
                "Parent comment belongs to a different article".into(),
            )));
        }
    }

    let comment = CommentRepo::create(
        &state.pool,
        article_id,
        auth.user_id,
        input.text.trim(),
        input.parent_comment_id,
    )
    .await?;

    tracing::info!(
        user_id = auth.user_id,
        article_id,
        comment_id = comment.id,
        "Comment created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// DELETE /api/v1/comments/{id}
///
/// Delete the caller's own comment. Replies cascade.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let comment = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;

    if comment.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the comment author can delete it".into(),
        )));
    }

    CommentRepo::delete(&state.pool, id).await?;

    tracing::info!(user_id = auth.user_id, comment_id = id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/comments/{id}/like
pub async fn like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comment",
            id,
        }))?;

    let inserted = CommentRepo::like(&state.pool, id, auth.user_id).await?;
    if !inserted {
        return Err(AppError::Core(CoreError::Conflict(
            "Comment is already liked".into(),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/comments/{id}/like
pub async fn unlike(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let removed = CommentRepo::unlike(&state.pool, id, auth.user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::Validation(
            "Comment is not liked".into(),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
