//! Route definitions for authentication.
//!
//! Registered under `/auth`.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Auth routes, registered as `/auth`.
///
/// ```text
/// POST /register   register (public)
/// POST /login      login (public)
/// POST /refresh    refresh token rotation (public)
/// POST /logout     revoke refresh token (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
}
