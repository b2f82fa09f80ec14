//! Route definitions for media uploads.
//!
//! Article-scoped media operations are nested under `/articles`; the raw
//! upload endpoint lives here under `/media`.

use axum::routing::post;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Media routes, registered as `/media`.
///
/// ```text
/// POST /upload   multipart file upload (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/upload", post(media::upload))
}
