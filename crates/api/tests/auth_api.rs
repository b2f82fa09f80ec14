//! HTTP-level integration tests for registration, login, token refresh,
//! logout, and account lockout.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, get_auth, post_json, post_json_auth};
use sqlx::PgPool;

/// Log in a user via the API and return the JSON response containing
/// `access_token`, `refresh_token`, and `user` info.
async fn login_user(app: axum::Router, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Successful registration returns 201 with the new profile.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_success(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let body = serde_json::json!({
        "username": "newuser",
        "email": "newuser@test.com",
        "password": "a-long-enough-password"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["username"], "newuser");
    assert_eq!(json["data"]["email"], "newuser@test.com");
    assert!(
        json["data"].get("password_hash").is_none(),
        "hash must never leave the server"
    );
}

/// A taken username is a 409.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_duplicate_username(pool: PgPool) {
    let (_id, _pw) = create_test_user(&pool, "taken").await;
    let app = common::build_test_app(pool).await;

    let body = serde_json::json!({
        "username": "taken",
        "email": "other@test.com",
        "password": "a-long-enough-password"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

/// A short password is rejected with 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_weak_password(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let body = serde_json::json!({
        "username": "weakpw",
        "email": "weakpw@test.com",
        "password": "short"
    });
    let response = post_json(app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Successful login returns 200 with access_token, refresh_token, and user info.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_success(pool: PgPool) {
    let (user_id, password) = create_test_user(&pool, "loginuser").await;
    let app = common::build_test_app(pool).await;

    let json = login_user(app, "loginuser", &password).await;

    assert!(
        json["access_token"].is_string(),
        "response must contain access_token"
    );
    assert!(
        json["refresh_token"].is_string(),
        "response must contain refresh_token"
    );
    assert!(
        json["expires_in"].is_number(),
        "response must contain expires_in"
    );
    assert_eq!(json["user"]["id"], user_id);
    assert_eq!(json["user"]["username"], "loginuser");
    assert_eq!(json["user"]["email"], "loginuser@test.com");
}

/// Login with an incorrect password returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let (_id, _pw) = create_test_user(&pool, "wrongpw").await;
    let app = common::build_test_app(pool).await;

    let body = serde_json::json!({ "username": "wrongpw", "password": "incorrect_password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Login with a nonexistent username returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_nonexistent_user(pool: PgPool) {
    let app = common::build_test_app(pool).await;

    let body = serde_json::json!({ "username": "ghost", "password": "whatever-password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Five consecutive failures lock the account; the sixth attempt with the
/// CORRECT password is rejected while locked.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_lockout_after_failures(pool: PgPool) {
    let (_id, password) = create_test_user(&pool, "lockme").await;
    let app = common::build_test_app(pool.clone()).await;

    for _ in 0..5 {
        let body = serde_json::json!({ "username": "lockme", "password": "bad-password" });
        let response = post_json(app.clone(), "/api/v1/auth/login", body).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let body = serde_json::json!({ "username": "lockme", "password": password });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(
        response.status(),
        StatusCode::FORBIDDEN,
        "locked account rejects even the correct password"
    );
}

// ---------------------------------------------------------------------------
// Refresh and logout
// ---------------------------------------------------------------------------

/// Refresh exchanges a valid token for a new pair and revokes the old one.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_refresh_rotates_token(pool: PgPool) {
    let (_id, password) = create_test_user(&pool, "refresher").await;
    let app = common::build_test_app(pool).await;

    let login = login_user(app.clone(), "refresher", &password).await;
    let refresh_token = login["refresh_token"].as_str().expect("token").to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(app.clone(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let refreshed = body_json(response).await;
    assert!(refreshed["access_token"].is_string());
    assert_ne!(refreshed["refresh_token"], login["refresh_token"]);

    // The old token was rotated out and cannot be replayed.
    let replay = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

/// Logout revokes the refresh token.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_refresh_token(pool: PgPool) {
    let (user_id, password) = create_test_user(&pool, "leaver").await;
    let app = common::build_test_app(pool).await;

    let login = login_user(app.clone(), "leaver", &password).await;
    let refresh_token = login["refresh_token"].as_str().expect("token").to_string();
    let access_token = common::auth_token(user_id, "leaver");

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json_auth(app.clone(), "/api/v1/auth/logout", &access_token, body.clone()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let replay = post_json(app, "/api/v1/auth/refresh", body).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Extractor behavior
// ---------------------------------------------------------------------------

/// A protected endpoint without a token returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_protected_endpoint_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = common::get(app, "/api/v1/users/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A garbage token returns 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_token_rejected(pool: PgPool) {
    let app = common::build_test_app(pool).await;
    let response = get_auth(app, "/api/v1/users/me", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
