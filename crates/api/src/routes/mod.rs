//! Route definitions, one module per resource.

use axum::Router;

use crate::state::AppState;

pub mod health;
pub mod item;
pub mod notification;
pub mod subscription;

/// All routes mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/subscriptions", subscription::router())
        .nest("/notifications", notification::router())
        .nest("/items", item::router())
}
