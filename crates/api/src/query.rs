//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic pagination parameters (`?page=&page_size=`).
///
/// Values are clamped via `shelfwatch_core::paging` before they reach the
/// repository layer.
#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
