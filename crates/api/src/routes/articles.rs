//! Route definitions for articles, their comments, likes, favorites, media,
//! and version history.
//!
//! Registered under `/articles`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{article_versions, articles, comments, favorites, media};
use crate::state::AppState;

/// Article routes, registered as `/articles`.
///
/// ```text
/// GET    /                                  list published
/// POST   /                                  create (auth)
/// GET    /mine                              own articles, any status (auth)
/// GET    /search                            search published
/// GET    /by-title                          published article by username + title
/// GET    /by-user/{user_id}                 a user's published articles
/// GET    /{id}                              single article view
/// PUT    /{id}                              versioned update (auth, owner)
/// DELETE /{id}                              delete + history cleanup (auth, owner)
/// POST   /{id}/like                         like (auth)
/// DELETE /{id}/like                         unlike (auth)
/// POST   /{id}/favorite                     add favorite (auth)
/// DELETE /{id}/favorite                     remove favorite (auth)
/// GET    /{id}/comments                     threaded comments (public)
/// POST   /{id}/comments                     create comment (auth)
/// GET    /{id}/media                        live media list
/// DELETE /{article_id}/media/{media_id}     delete media (auth, owner)
/// GET    /{id}/versions                     version history (auth)
/// POST   /{id}/versions/{version}/restore   restore snapshot (auth, owner)
/// DELETE /{id}/versions/{version}           delete snapshot (auth, version author)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(articles::list_published).post(articles::create),
        )
        .route("/mine", get(articles::list_mine))
        .route("/search", get(articles::search))
        .route("/by-title", get(articles::get_by_title))
        .route("/by-user/{user_id}", get(articles::list_by_user))
        .route(
            "/{id}",
            get(articles::get_by_id)
                .put(articles::update)
                .delete(articles::delete),
        )
        .route(
            "/{id}/like",
            post(articles::like).delete(articles::unlike),
        )
        .route(
            "/{id}/favorite",
            post(favorites::add).delete(favorites::remove),
        )
        .route(
            "/{id}/comments",
            get(comments::list_by_article).post(comments::create),
        )
        .route("/{id}/media", get(media::list_by_article))
        .route("/{article_id}/media/{media_id}", delete(media::delete))
        .route("/{id}/versions", get(article_versions::list))
        .route(
            "/{id}/versions/{version}",
            delete(article_versions::delete),
        )
        .route(
            "/{id}/versions/{version}/restore",
            post(article_versions::restore),
        )
}
