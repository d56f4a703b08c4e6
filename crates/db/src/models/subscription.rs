//! Alert subscription models and DTOs.

use serde::Serialize;
use shelfwatch_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `subscriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscription {
    pub id: DbId,
    pub seller_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub criteria: serde_json::Value,
    pub criteria_signature: String,
    pub notify_via_email: bool,
    pub is_active: bool,
    pub last_triggered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload for a new subscription. Criteria must already be
/// sanitized and the signature derived from it.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub seller_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub criteria: serde_json::Value,
    pub criteria_signature: String,
    pub notify_via_email: bool,
}

/// Partial update for a subscription. `None` fields are left untouched.
///
/// `description` is doubly optional: the outer `None` means "don't
/// touch", `Some(None)` clears the stored value. `criteria` and
/// `criteria_signature` travel together: the repository never accepts
/// one without the other.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub notify_via_email: Option<bool>,
    pub is_active: Option<bool>,
    pub criteria: Option<serde_json::Value>,
    pub criteria_signature: Option<String>,
}

/// An active subscription joined with its owner's email, as loaded by the
/// dispatch engine.
#[derive(Debug, Clone, FromRow)]
pub struct ActiveSubscription {
    pub id: DbId,
    pub seller_id: DbId,
    pub name: String,
    pub criteria: serde_json::Value,
    pub notify_via_email: bool,
    pub seller_email: Option<String>,
}
