//! Route definitions for categories.
//!
//! Registered under `/categories`.

use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category routes, registered as `/categories`.
///
/// ```text
/// GET /                    list categories
/// GET /{slug}/articles     published articles in category (case-insensitive slug)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list))
        .route("/{slug}/articles", get(categories::articles_by_category))
}
