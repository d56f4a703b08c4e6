//! Liveness endpoint, mounted at the root rather than under `/api/v1`
//! so load balancers can probe it without auth or versioning.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when every probe passes, `"degraded"` otherwise.
    pub status: &'static str,
    /// Connectivity of the notification store.
    pub database: &'static str,
    pub version: &'static str,
}

/// GET /health
///
/// The service stays up with a degraded status when the database is
/// unreachable; alert dispatch is paused but the process is alive.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database_up = shelfwatch_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if database_up { "ok" } else { "degraded" },
        database: if database_up { "up" } else { "down" },
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
