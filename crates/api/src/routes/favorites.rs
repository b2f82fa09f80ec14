//! Route definitions for the caller's favorites list.
//!
//! Add/remove is nested under `/articles/{id}/favorite`; the listing lives
//! here under `/favorites`.

use axum::routing::get;
use axum::Router;

use crate::handlers::favorites;
use crate::state::AppState;

/// Favorite routes, registered as `/favorites`.
///
/// ```text
/// GET /   caller's favorited articles (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(favorites::list))
}
