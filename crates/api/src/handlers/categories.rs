//! Handlers for the `/categories` resource.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use khub_core::error::CoreError;
use khub_db::repositories::{ArticleRepo, CategoryRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::articles::attach_media;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = CategoryRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/{slug}/articles
///
/// Published articles in a category. The slug match is case-insensitive;
/// 404 when the category is unknown or holds no published articles.
pub async fn articles_by_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Category",
                key: slug.clone(),
            })
        })?;

    let articles = ArticleRepo::list_published_by_category(&state.pool, category.id).await?;
    if articles.is_empty() {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Article",
            key: format!("category '{}'", category.slug),
        }));
    }

    let views = attach_media(&state.pool, articles).await?;
    Ok(Json(DataResponse { data: views }))
}
