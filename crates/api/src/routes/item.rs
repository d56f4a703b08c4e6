//! Route definitions for the `/items` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::item;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// POST   /       -> create_item (publishes item.created)
/// GET    /{id}   -> get_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(item::create_item))
        .route("/{id}", get(item::get_item))
}
