//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope per project
//! conventions. Use [`DataResponse`] instead of ad-hoc
//! `serde_json::json!({ "data": ... })` to get compile-time type safety
//! and consistent serialization.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paginated `{ "data": [...], "meta": { page, page_size, count } }`
/// envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

/// Pagination metadata echoed back to the client.
#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub page_size: i64,
    pub count: usize,
}

impl<T: Serialize> PageResponse<T> {
    pub fn new(data: Vec<T>, page: i64, page_size: i64) -> Self {
        let count = data.len();
        Self {
            data,
            meta: PageMeta {
                page,
                page_size,
                count,
            },
        }
    }
}
