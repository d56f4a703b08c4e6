//! Pagination defaults shared by all list endpoints.

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page number to a 1-based value.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// Clamp a requested page size into `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(page_size: Option<i64>) -> i64 {
    page_size
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

/// Row offset for a 1-based page number.
pub fn offset(page: i64, page_size: i64) -> i64 {
    (page - 1) * page_size
}
