//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so tests
//! exercise the same middleware stack (CORS, request ID, timeout, tracing,
//! panic recovery) that production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use khub_api::auth::jwt::{generate_access_token, JwtConfig};
use khub_api::auth::password::hash_password;
use khub_api::config::ServerConfig;
use khub_api::router::build_app_router;
use khub_api::state::AppState;
use khub_db::models::user::CreateUser;
use khub_db::repositories::UserRepo;
use khub_versioning::lookups::{PgCategoryResolver, PgIdentityProvider};
use khub_versioning::{PgVersionStore, VersioningEngine};

/// JWT config with a fixed secret shared by the app and token helpers.
pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
    }
}

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_storage_dir: std::env::temp_dir().join("khub-test-media"),
        jwt: test_jwt_config(),
    }
}

/// Build the full application router over the given pool.
///
/// The version store shares the test database (its migrations are applied
/// here); the engine still never spans the two stores with one transaction.
pub async fn build_test_app(pool: PgPool) -> Router {
    let store = PgVersionStore::from_pool(pool.clone());
    store
        .run_migrations()
        .await
        .expect("version-store migrations should apply");

    let engine = Arc::new(VersioningEngine::new(
        pool.clone(),
        Arc::new(store),
        Arc::new(PgIdentityProvider::new(pool.clone())),
        Arc::new(PgCategoryResolver::new(pool.clone())),
    ));

    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        engine,
    };
    build_app_router(state, &config)
}

/// Create a test user directly in the database; returns (user id, password).
pub async fn create_test_user(pool: &PgPool, username: &str) -> (i64, String) {
    let password = "test_password_123!";
    let hashed = hash_password(password).expect("hashing should succeed");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hashed,
            bio: None,
        },
    )
    .await
    .expect("user creation should succeed");
    (user.id, password.to_string())
}

/// Mint an access token for a user without going through the login endpoint.
pub fn auth_token(user_id: i64, username: &str) -> String {
    generate_access_token(user_id, username, &test_jwt_config())
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should run")
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should run")
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should run")
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should run")
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should run")
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should run")
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method("DELETE")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should run")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
