//! Notification models and feed projections.

use serde::Serialize;
use shelfwatch_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub seller_id: DbId,
    pub subscription_id: Option<DbId>,
    pub item_id: Option<DbId>,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub delivered_at: Timestamp,
    pub email_sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Insert payload for a notification produced by the dispatch engine.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub seller_id: DbId,
    pub subscription_id: DbId,
    pub item_id: DbId,
    pub title: String,
    pub body: String,
}

/// A notification joined with minimal item and subscription projections
/// for the seller-facing feed.
///
/// The joined columns are `NULL` when the referenced row has since been
/// deleted; the API surfaces that as a "deleted" state rather than hiding
/// the notification.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationFeedRow {
    pub id: DbId,
    pub seller_id: DbId,
    pub subscription_id: Option<DbId>,
    pub item_id: Option<DbId>,
    pub title: String,
    pub body: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub delivered_at: Timestamp,
    pub email_sent_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub item_name: Option<String>,
    pub item_status: Option<String>,
    pub item_languages: Option<String>,
    pub subscription_name: Option<String>,
}
