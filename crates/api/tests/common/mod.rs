//! Shared helpers for API integration tests.
//!
//! Builds the real application router (same middleware stack as the
//! binary) over a per-test database, and provides request/response
//! helpers plus seed data constructors.

// Each test binary compiles its own copy; not all of them use every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use shelfwatch_api::auth::jwt::{generate_access_token, JwtConfig};
use shelfwatch_api::config::ServerConfig;
use shelfwatch_api::router::build_app_router;
use shelfwatch_api::state::AppState;
use shelfwatch_db::repositories::SellerRepo;
use shelfwatch_db::resolver::PgRelationResolver;
use shelfwatch_events::EventBus;
use sqlx::PgPool;
use tower::ServiceExt;

/// Server configuration used by every test; never reads the environment.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 5,
        frontend_url: "http://localhost:5173/".to_string(),
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            access_token_expiry_mins: 5,
        },
    }
}

/// Build the application router over the given test pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        event_bus: Arc::new(EventBus::default()),
        resolver: Arc::new(PgRelationResolver::new(pool)),
    };
    build_app_router(state, &config)
}

/// Create a seller row and mint an access token for it.
pub async fn seed_authed_seller(pool: &PgPool, email: Option<&str>, name: &str) -> (i64, String) {
    let seller = SellerRepo::create(pool, email, name).await.unwrap();
    let token = generate_access_token(seller.id, &test_config().jwt).unwrap();
    (seller.id, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: &str,
    body: &serde_json::Value,
) -> Response<Body> {
    send_json(app, "POST", uri, token, body).await
}

pub async fn patch_json(
    app: &Router,
    uri: &str,
    token: &str,
    body: &serde_json::Value,
) -> Response<Body> {
    send_json(app, "PATCH", uri, token, body).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: &serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// Consume a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a status code, printing the body on mismatch.
pub async fn assert_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let body = body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {body}");
    body
}
