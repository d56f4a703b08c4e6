//! End-to-end tests for the `/api/v1/items` ingestion surface.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{assert_status, build_test_app, get, post_json, seed_authed_seller};

#[sqlx::test(migrations = "../db/migrations")]
async fn ingest_and_fetch_item(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let created = assert_status(
        post_json(
            &app,
            "/api/v1/items",
            &token,
            &json!({
                "name": "Intro to Rust",
                "languages": "English",
                "item_status": "published",
                "start_date": "2026-09-01"
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["languages"], "English");

    let fetched = assert_status(
        get(&app, &format!("/api/v1/items/{id}"), &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(fetched["data"]["name"], "Intro to Rust");
    assert_eq!(fetched["data"]["start_date"], "2026-09-01");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn ingest_rejects_blank_name(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let body = assert_status(
        post_json(&app, "/api/v1/items", &token, &json!({ "name": "   " })).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_item_is_not_found(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let body = assert_status(
        get(&app, "/api/v1/items/999999", &token).await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(body["code"], "NOT_FOUND");
}
