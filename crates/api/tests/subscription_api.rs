//! End-to-end tests for the `/api/v1/subscriptions` resource.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use common::{
    assert_status, build_test_app, delete, get, patch_json, post_json, seed_authed_seller,
};

#[sqlx::test(migrations = "../db/migrations")]
async fn create_sanitizes_criteria(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let response = post_json(
        &app,
        "/api/v1/subscriptions",
        &token,
        &json!({
            "name": "  English items  ",
            "criteria": {
                "languages": "english",
                "category_id": null,
                "erc_area": "   "
            }
        }),
    )
    .await;

    let body = assert_status(response, StatusCode::CREATED).await;
    let data = &body["data"];
    assert_eq!(data["name"], "English items");
    assert_eq!(data["criteria"], json!({ "languages": "english" }));
    assert_eq!(data["notify_via_email"], json!(true));
    assert!(data["criteria_signature"].as_str().is_some_and(|s| !s.is_empty()));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_blank_name(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let response = post_json(
        &app,
        "/api/v1/subscriptions",
        &token,
        &json!({ "name": "   ", "criteria": { "languages": "english" } }),
    )
    .await;

    let body = assert_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_rejects_criteria_that_sanitize_to_nothing(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let response = post_json(
        &app,
        "/api/v1/subscriptions",
        &token,
        &json!({
            "name": "Empty alert",
            "criteria": { "languages": "  ", "category_id": null }
        }),
    )
    .await;

    let body = assert_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_duplicate_criteria_conflicts(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let first = post_json(
        &app,
        "/api/v1/subscriptions",
        &token,
        &json!({
            "name": "English PE",
            "criteria": { "languages": "english", "erc_area": "PE" }
        }),
    )
    .await;
    assert_status(first, StatusCode::CREATED).await;

    // Same filters, different key order and stray whitespace: the
    // canonical signature still collides.
    let second = post_json(
        &app,
        "/api/v1/subscriptions",
        &token,
        &json!({
            "name": "Different label, same filters",
            "criteria": { "erc_area": "PE", "languages": " english " }
        }),
    )
    .await;

    let body = assert_status(second, StatusCode::CONFLICT).await;
    assert_eq!(body["error"], "This alert already exists for your account");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_criteria_allowed_across_sellers(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token_a) = seed_authed_seller(&pool, None, "Seller A").await;
    let (_, token_b) = seed_authed_seller(&pool, None, "Seller B").await;

    let payload = json!({
        "name": "English items",
        "criteria": { "languages": "english" }
    });

    let first = post_json(&app, "/api/v1/subscriptions", &token_a, &payload).await;
    assert_status(first, StatusCode::CREATED).await;

    let second = post_json(&app, "/api/v1/subscriptions", &token_b, &payload).await;
    assert_status(second, StatusCode::CREATED).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_is_owner_scoped_with_resolved_criteria(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token_a) = seed_authed_seller(&pool, None, "Seller A").await;
    let (_, token_b) = seed_authed_seller(&pool, None, "Seller B").await;

    let created = post_json(
        &app,
        "/api/v1/subscriptions",
        &token_a,
        &json!({ "name": "English items", "criteria": { "languages": "english" } }),
    )
    .await;
    assert_status(created, StatusCode::CREATED).await;

    let body = assert_status(
        get(&app, "/api/v1/subscriptions", &token_a).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["meta"]["count"], json!(1));
    assert_eq!(
        body["data"][0]["criteria_resolved"],
        json!({ "languages": "english" })
    );

    let other = assert_status(
        get(&app, "/api/v1/subscriptions", &token_b).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(other["meta"]["count"], json!(0));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_changes_only_provided_fields(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let created = assert_status(
        post_json(
            &app,
            "/api/v1/subscriptions",
            &token,
            &json!({ "name": "English items", "criteria": { "languages": "english" } }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let original_signature = created["data"]["criteria_signature"].clone();

    let body = assert_status(
        patch_json(
            &app,
            &format!("/api/v1/subscriptions/{id}"),
            &token,
            &json!({ "name": "Renamed", "is_active": false }),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["data"]["name"], "Renamed");
    assert_eq!(body["data"]["is_active"], json!(false));
    assert_eq!(body["data"]["criteria_signature"], original_signature);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_distinguishes_null_description_from_absent(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let created = assert_status(
        post_json(
            &app,
            "/api/v1/subscriptions",
            &token,
            &json!({
                "name": "English items",
                "description": "Alert me about English items",
                "criteria": { "languages": "english" }
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/subscriptions/{id}");

    // Body without the field: description stays.
    let renamed = assert_status(
        patch_json(&app, &uri, &token, &json!({ "name": "Renamed" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(
        renamed["data"]["description"],
        "Alert me about English items"
    );

    // Explicit null: description is cleared.
    let cleared = assert_status(
        patch_json(&app, &uri, &token, &json!({ "description": null })).await,
        StatusCode::OK,
    )
    .await;
    assert!(cleared["data"]["description"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_resigns_new_criteria(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let created = assert_status(
        post_json(
            &app,
            "/api/v1/subscriptions",
            &token,
            &json!({ "name": "English items", "criteria": { "languages": "english" } }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let body = assert_status(
        patch_json(
            &app,
            &format!("/api/v1/subscriptions/{id}"),
            &token,
            &json!({ "criteria": { "languages": "french" } }),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["data"]["criteria"], json!({ "languages": "french" }));
    assert_ne!(
        body["data"]["criteria_signature"],
        created["data"]["criteria_signature"]
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn cross_owner_access_is_forbidden(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token_a) = seed_authed_seller(&pool, None, "Seller A").await;
    let (_, token_b) = seed_authed_seller(&pool, None, "Seller B").await;

    let created = assert_status(
        post_json(
            &app,
            "/api/v1/subscriptions",
            &token_a,
            &json!({ "name": "Mine", "criteria": { "languages": "english" } }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/subscriptions/{id}");

    let body = assert_status(
        patch_json(&app, &uri, &token_b, &json!({ "name": "Stolen" })).await,
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(body["code"], "FORBIDDEN");

    assert_eq!(
        delete(&app, &uri, &token_b).await.status(),
        StatusCode::FORBIDDEN
    );

    // Still present and untouched for its owner.
    let listed = assert_status(
        get(&app, "/api/v1/subscriptions", &token_a).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed["data"][0]["name"], "Mine");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_removes_subscription(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, token) = seed_authed_seller(&pool, None, "Seller A").await;

    let created = assert_status(
        post_json(
            &app,
            "/api/v1/subscriptions",
            &token,
            &json!({ "name": "Short lived", "criteria": { "languages": "english" } }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let response = delete(&app, &format!("/api/v1/subscriptions/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let listed = assert_status(
        get(&app, "/api/v1/subscriptions", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(listed["meta"]["count"], json!(0));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_token_is_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/subscriptions")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
