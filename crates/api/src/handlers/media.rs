//! Handlers for media uploads and article media attachments.
//!
//! Uploaded files land under `MEDIA_STORAGE_DIR`; the returned URL is the
//! stored path. Object-storage proxying is an external collaborator -- the
//! upload endpoint's contract is just file-in, url+type out. Attachment to
//! an article happens via the article create/update media lists.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use khub_core::article::{validate_media_description, MediaType};
use khub_core::error::CoreError;
use khub_core::types::DbId;
use khub_db::repositories::{ArticleRepo, MediaRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::articles::ensure_article;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response for a successful upload: what the client feeds back into an
/// article's media list.
#[derive(Debug, Serialize)]
pub struct MediaUploadResponse {
    pub url: String,
    pub media_type: String,
    pub description: Option<String>,
}

/// POST /api/v1/media/upload
///
/// Accepts a multipart form with a required `file` field and an optional
/// `description` field. The media type is inferred from the file's MIME
/// content type.
pub async fn upload(
    auth: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<MediaUploadResponse>>)> {
    let mut file_data: Option<(String, String, Vec<u8>)> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload.bin").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, content_type, data.to_vec()));
            }
            "description" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                description = Some(text);
            }
            _ => {} // ignore unknown fields
        }
    }

    let (filename, content_type, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if data.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    if let Some(text) = &description {
        validate_media_description(text).map_err(AppError::Core)?;
    }

    let media_type = MediaType::from_mime(&content_type);

    // Randomized prefix keeps uploads with the same filename apart.
    let storage_dir = &state.config.media_storage_dir;
    tokio::fs::create_dir_all(storage_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let stored_filename = format!("{}_{filename}", Uuid::new_v4());
    let file_path = storage_dir.join(&stored_filename);
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(
        user_id = auth.user_id,
        path = %file_path.display(),
        size_bytes = data.len(),
        "Media file stored"
    );

    let response = MediaUploadResponse {
        url: file_path.to_string_lossy().to_string(),
        media_type: media_type.as_str().to_string(),
        description,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/articles/{id}/media
pub async fn list_by_article(
    State(state): State<AppState>,
    Path(article_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_article(&state.pool, article_id).await?;
    let media = MediaRepo::list_by_article(&state.pool, article_id).await?;
    Ok(Json(DataResponse { data: media }))
}

/// DELETE /api/v1/articles/{article_id}/media/{media_id}
///
/// Detach and delete one media row. Article owner only.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((article_id, media_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let media = MediaRepo::find_by_id(&state.pool, media_id)
        .await?
        .filter(|m| m.article_id == article_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Media",
            id: media_id,
        }))?;

    let article = ArticleRepo::find_by_id(&state.pool, media.article_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Article",
            id: media.article_id,
        }))?;
    if article.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the article owner can delete its media".into(),
        )));
    }

    MediaRepo::delete(&state.pool, media_id).await?;

    tracing::info!(
        user_id = auth.user_id,
        article_id,
        media_id,
        "Media deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
