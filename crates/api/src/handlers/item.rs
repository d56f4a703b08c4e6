//! Handlers for the `/items` resource.
//!
//! Items belong to the catalog platform; this service only ingests them
//! on its behalf and publishes the item-created event once the row is
//! durably persisted. Alert evaluation happens asynchronously in the
//! dispatch engine.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use shelfwatch_core::error::CoreError;
use shelfwatch_core::types::DbId;
use shelfwatch_db::models::item::{CreateItem, Item};
use shelfwatch_db::repositories::ItemRepo;
use shelfwatch_events::CatalogEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSeller;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/items
///
/// Ingest a catalog item. The event is published only after the insert
/// returns, so the dispatch engine always finds the row.
pub async fn create_item(
    auth: AuthSeller,
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Item name is required".into(),
        )));
    }

    let item = ItemRepo::create(&state.pool, &input).await?;

    tracing::info!(seller_id = auth.seller_id, item_id = item.id, "Item ingested");

    state.event_bus.publish(CatalogEvent::item_created(item.id));

    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// GET /api/v1/items/{id}
pub async fn get_item(
    _auth: AuthSeller,
    State(state): State<AppState>,
    Path(item_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Item>>> {
    let item = ItemRepo::find_by_id(&state.pool, item_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        }))?;

    Ok(Json(DataResponse { data: item }))
}
