//! Route definitions for comment deletion and likes.
//!
//! Comment creation/listing is nested under `/articles/{id}/comments`; the
//! by-id operations live here under `/comments`.

use axum::routing::{delete, post};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Comment routes, registered as `/comments`.
///
/// ```text
/// DELETE /{id}        delete own comment (auth)
/// POST   /{id}/like   like (auth)
/// DELETE /{id}/like   unlike (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(comments::delete))
        .route("/{id}/like", post(comments::like).delete(comments::unlike))
}
