pub mod articles;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod favorites;
pub mod health;
pub mod media;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /users/me                                        get, update own profile
///
/// /categories                                      list
/// /categories/{slug}/articles                      published articles by category
///
/// /articles                                        list published, create
/// /articles/mine                                   own articles (any status)
/// /articles/search                                 search published
/// /articles/by-title                               published article by username + title
/// /articles/by-user/{user_id}                      a user's published articles
/// /articles/{id}                                   get, versioned update, delete
/// /articles/{id}/like                              like, unlike
/// /articles/{id}/favorite                          add, remove favorite
/// /articles/{id}/comments                          list, create
/// /articles/{id}/media                             list live media
/// /articles/{article_id}/media/{media_id}          delete media
/// /articles/{id}/versions                          version history
/// /articles/{id}/versions/{version}                delete snapshot
/// /articles/{id}/versions/{version}/restore        restore snapshot
///
/// /comments/{id}                                   delete
/// /comments/{id}/like                              like, unlike
///
/// /favorites                                       caller's favorites
///
/// /media/upload                                    multipart upload
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/categories", categories::router())
        .nest("/articles", articles::router())
        .nest("/comments", comments::router())
        .nest("/favorites", favorites::router())
        .nest("/media", media::router())
}
