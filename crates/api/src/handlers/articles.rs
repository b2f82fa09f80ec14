//! Handlers for the `/articles` resource.
//!
//! Create/read/delete and likes are plain CRUD against the live store; the
//! versioned update path is delegated to the versioning engine so every edit
//! snapshots pre-edit state first.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sqlx::PgPool;

use khub_core::article::{validate_content, validate_title, ArticleStatus};
use khub_core::error::CoreError;
use khub_core::markup::render_markup;
use khub_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use khub_core::types::DbId;
use khub_db::models::article::{
    Article, ArticleView, ArticleWithMeta, CreateArticle, CreateArticleRequest,
    UpdateArticleRequest,
};
use khub_db::repositories::{ArticleRepo, CategoryRepo, MediaRepo};
use khub_versioning::engine::parse_media_items;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Query param types
-------------------------------------------------------------------------- */

#[derive(Debug, serde::Deserialize)]
pub struct ListArticlesParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, serde::Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ByTitleParams {
    pub username: Option<String>,
    pub title: Option<String>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Attach each article's live media list to build full views.
pub(crate) async fn attach_media(
    pool: &PgPool,
    articles: Vec<ArticleWithMeta>,
) -> Result<Vec<ArticleView>, sqlx::Error> {
    let mut views = Vec::with_capacity(articles.len());
    for article in articles {
        let media_items = MediaRepo::list_by_article(pool, article.id).await?;
        views.push(ArticleView {
            article,
            media_items,
        });
    }
    Ok(views)
}

/// Fetch an article row or return 404.
pub(crate) async fn ensure_article(pool: &PgPool, id: DbId) -> AppResult<Article> {
    ArticleRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))
}

/* --------------------------------------------------------------------------
Read endpoints
-------------------------------------------------------------------------- */

/// GET /api/v1/articles
///
/// List all published articles, newest first.
pub async fn list_published(
    State(state): State<AppState>,
    Query(params): Query<ListArticlesParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);

    let articles = ArticleRepo::list_published(&state.pool, limit, offset).await?;
    let views = attach_media(&state.pool, articles).await?;
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/articles/mine
///
/// List the caller's articles regardless of status.
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let articles = ArticleRepo::list_by_owner(&state.pool, auth.user_id).await?;
    let views = attach_media(&state.pool, articles).await?;
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/articles/by-user/{user_id}
///
/// List a user's published articles.
pub async fn list_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let articles = ArticleRepo::list_published_by_owner(&state.pool, user_id).await?;
    let views = attach_media(&state.pool, articles).await?;
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/articles/search?q=term
///
/// ILIKE search over title and content of published articles.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<impl IntoResponse> {
    let q = params.q.unwrap_or_default();
    if q.trim().is_empty() {
        return Err(AppError::BadRequest("Search term must not be empty".into()));
    }

    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let articles = ArticleRepo::search_published(&state.pool, q.trim(), limit).await?;
    if articles.is_empty() {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Article",
            key: format!("search '{}'", q.trim()),
        }));
    }

    let views = attach_media(&state.pool, articles).await?;
    Ok(Json(DataResponse { data: views }))
}

/// GET /api/v1/articles/by-title?username=U&title=T
///
/// Look up a published article by its author's username and exact title.
pub async fn get_by_title(
    State(state): State<AppState>,
    Query(params): Query<ByTitleParams>,
) -> AppResult<impl IntoResponse> {
    let username = params.username.unwrap_or_default();
    let title = params.title.unwrap_or_default();
    if username.trim().is_empty() || title.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Both 'username' and 'title' must be provided".into(),
        ));
    }

    let article = ArticleRepo::find_by_owner_and_title(&state.pool, username.trim(), title.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Article",
                key: format!("user '{}', title '{}'", username.trim(), title.trim()),
            })
        })?;
    let media_items = MediaRepo::list_by_article(&state.pool, article.id).await?;
    Ok(Json(DataResponse {
        data: ArticleView {
            article,
            media_items,
        },
    }))
}

/// GET /api/v1/articles/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let article = ArticleRepo::find_with_meta(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id,
        }))?;
    let media_items = MediaRepo::list_by_article(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: ArticleView {
            article,
            media_items,
        },
    }))
}

/* --------------------------------------------------------------------------
Write endpoints
-------------------------------------------------------------------------- */

/// POST /api/v1/articles
///
/// Create an article. Version history starts empty; the first snapshot is
/// written by the first update.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateArticleRequest>,
) -> AppResult<impl IntoResponse> {
    validate_title(&input.title).map_err(AppError::Core)?;
    validate_content(&input.content_source).map_err(AppError::Core)?;

    let status = match &input.status {
        Some(s) => ArticleStatus::parse(s).map_err(AppError::Core)?,
        None => ArticleStatus::Draft,
    };
    let media_items = parse_media_items(&input.media_items).map_err(AppError::Core)?;

    let category = CategoryRepo::find_by_slug(&state.pool, &input.category_slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Category",
                key: input.category_slug.clone(),
            })
        })?;

    let article = ArticleRepo::create(
        &state.pool,
        &CreateArticle {
            title: input.title,
            content_rendered: render_markup(&input.content_source),
            content_source: input.content_source,
            status: status.as_str().to_string(),
            category_id: category.id,
            owner_id: auth.user_id,
        },
    )
    .await?;

    for item in &media_items {
        MediaRepo::create(&state.pool, article.id, item).await?;
    }

    tracing::info!(
        user_id = auth.user_id,
        article_id = article.id,
        "Article created"
    );

    let meta = ArticleRepo::find_with_meta(&state.pool, article.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id: article.id,
        }))?;
    let media = MediaRepo::list_by_article(&state.pool, article.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ArticleView {
                article: meta,
                media_items: media,
            },
        }),
    ))
}

/// PUT /api/v1/articles/{id}
///
/// Versioned update: snapshots the pre-edit state into the version store,
/// then applies the new content. Owner only.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArticleRequest>,
) -> AppResult<impl IntoResponse> {
    let view = state.engine.update(id, auth.user_id, &input).await?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/articles/{id}
///
/// Owner only. Live rows cascade in the relational store; version history is
/// removed synchronously right after.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let article = ensure_article(&state.pool, id).await?;
    if article.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the article owner can delete it".into(),
        )));
    }

    ArticleRepo::delete(&state.pool, id).await?;
    let removed_versions = state.engine.delete_history(id).await?;

    tracing::info!(
        user_id = auth.user_id,
        article_id = id,
        removed_versions,
        "Article deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Likes
-------------------------------------------------------------------------- */

/// POST /api/v1/articles/{id}/like
pub async fn like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_article(&state.pool, id).await?;
    let inserted = ArticleRepo::like(&state.pool, id, auth.user_id).await?;
    if !inserted {
        return Err(AppError::Core(CoreError::Conflict(
            "Article is already liked".into(),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/articles/{id}/like
pub async fn unlike(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_article(&state.pool, id).await?;
    let removed = ArticleRepo::unlike(&state.pool, id, auth.user_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::Validation(
            "Article is not liked".into(),
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}
