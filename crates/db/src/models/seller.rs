//! Seller entity model.

use serde::Serialize;
use shelfwatch_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `sellers` table.
///
/// `email` is optional: a seller without a resolvable address simply never
/// receives alert emails.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Seller {
    pub id: DbId,
    pub email: Option<String>,
    pub display_name: String,
    pub created_at: Timestamp,
}
