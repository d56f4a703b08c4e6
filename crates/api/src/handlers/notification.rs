//! Handlers for the `/notifications` resource.
//!
//! Notifications are created by the dispatch engine only; sellers can
//! read them and flip their read state, nothing else.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use shelfwatch_core::error::CoreError;
use shelfwatch_core::paging;
use shelfwatch_core::types::DbId;
use shelfwatch_db::models::notification::{Notification, NotificationFeedRow};
use shelfwatch_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthSeller;
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// If `true`, return only unread notifications. Defaults to `false`.
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Body for `POST /notifications/{id}/read`.
#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    /// Defaults to `true`; pass `false` to mark unread again.
    #[serde(default = "default_read")]
    pub is_read: bool,
}

fn default_read() -> bool {
    true
}

/// Payload of `POST /notifications/read-all`.
#[derive(Debug, Serialize)]
pub struct MarkAllReadResult {
    /// How many notifications this call flipped to read.
    pub marked_read: u64,
}

/// Payload of `GET /notifications/unread-count`.
#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/notifications
///
/// List the authenticated seller's notification feed, newest first. Rows
/// whose item or subscription has been deleted keep their text but carry
/// `null` projections so clients can render a "deleted" state.
pub async fn list_notifications(
    auth: AuthSeller,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<PageResponse<NotificationFeedRow>>> {
    let page = paging::clamp_page(params.page);
    let page_size = paging::clamp_page_size(params.page_size);

    let notifications = NotificationRepo::list_for_seller(
        &state.pool,
        auth.seller_id,
        params.unread_only,
        page_size,
        paging::offset(page, page_size),
    )
    .await?;

    Ok(Json(PageResponse::new(notifications, page, page_size)))
}

/// POST /api/v1/notifications/{id}/read
///
/// Set the read flag on a single notification. 404 if the notification
/// does not exist, 403 if it belongs to another seller.
pub async fn mark_read(
    auth: AuthSeller,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
    Json(input): Json<MarkReadRequest>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let existing = NotificationRepo::find_by_id(&state.pool, notification_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }))?;

    if existing.seller_id != auth.seller_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You cannot modify this notification".into(),
        )));
    }

    let notification =
        NotificationRepo::set_read(&state.pool, notification_id, auth.seller_id, input.is_read)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Notification",
                id: notification_id,
            }))?;

    Ok(Json(DataResponse { data: notification }))
}

/// POST /api/v1/notifications/read-all
///
/// Mark all of the authenticated seller's notifications as read.
/// Returns the number of notifications that were marked.
pub async fn mark_all_read(
    auth: AuthSeller,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<MarkAllReadResult>>> {
    let marked_read = NotificationRepo::mark_all_read(&state.pool, auth.seller_id).await?;

    Ok(Json(DataResponse {
        data: MarkAllReadResult { marked_read },
    }))
}

/// GET /api/v1/notifications/unread-count
///
/// Return the number of unread notifications for the authenticated seller.
pub async fn unread_count(
    auth: AuthSeller,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.seller_id).await?;

    Ok(Json(DataResponse {
        data: UnreadCount { count },
    }))
}
