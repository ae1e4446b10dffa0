//! Pagination constants, clamps, and the shared page envelope.
//!
//! Paged list endpoints return a [`Page`] with pagination metadata so the
//! admin UI can render page controls without a second count request.

use serde::Serialize;

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum number of rows per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a requested page size into `[1, MAX_PAGE_SIZE]`.
pub fn clamp_page_size(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

/// Clamp a requested 1-based page number to at least 1.
pub fn clamp_page(requested: Option<i64>) -> i64 {
    requested.unwrap_or(1).max(1)
}

/// Number of pages needed for `total_items` rows at `page_size` per page.
pub fn total_pages(total_items: i64, page_size: i64) -> i64 {
    if total_items == 0 {
        0
    } else {
        (total_items + page_size - 1) / page_size
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T: Serialize> Page<T> {
    /// Build a page envelope, deriving `total_pages` from the count.
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total_items: i64) -> Self {
        Self {
            items,
            page,
            page_size,
            total_items,
            total_pages: total_pages(total_items, page_size),
        }
    }
}
