//! The root-level liveness probe.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlx::PgPool;
use tower::ServiceExt;

use common::{body_json, build_test_app};

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_database_up(pool: PgPool) {
    let app = build_test_app(pool);

    // No auth header: the probe must be reachable by a bare load balancer.
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
    assert!(body["version"].as_str().is_some_and(|v| !v.is_empty()));
}
