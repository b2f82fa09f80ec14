//! Route definitions for the current user's profile.
//!
//! Registered under `/users`.

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User routes, registered as `/users`.
///
/// ```text
/// GET /me   own profile (requires auth)
/// PUT /me   update own profile (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(users::me).put(users::update_me))
}
