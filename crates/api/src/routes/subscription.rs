//! Route definitions for the `/subscriptions` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::subscription;
use crate::state::AppState;

/// Routes mounted at `/subscriptions`.
///
/// ```text
/// GET    /        -> list_subscriptions
/// POST   /        -> create_subscription
/// PATCH  /{id}    -> update_subscription
/// DELETE /{id}    -> delete_subscription
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(subscription::list_subscriptions).post(subscription::create_subscription),
        )
        .route(
            "/{id}",
            patch(subscription::update_subscription).delete(subscription::delete_subscription),
        )
}
