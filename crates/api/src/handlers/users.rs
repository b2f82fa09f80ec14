//! Handlers for the `/users` resource (own-profile read and update).

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use khub_core::error::CoreError;
use khub_db::models::user::{UpdateUser, UserProfile};
use khub_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /users/me`. All fields optional.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
}

/// GET /api/v1/users/me
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: user.into_profile(),
    }))
}

/// PUT /api/v1/users/me
///
/// Update the caller's own profile. Username/email collisions surface as 409
/// via the unique constraints.
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserProfile>>> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let update = UpdateUser {
        username: input.username,
        email: input.email,
        bio: input.bio,
    };
    let user = UserRepo::update(&state.pool, auth.user_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    tracing::info!(user_id = user.id, "User profile updated");

    Ok(Json(DataResponse {
        data: user.into_profile(),
    }))
}
