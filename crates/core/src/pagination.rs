//! Windowed page navigation.
//!
//! The requested page is clamped into `[1, total_pages]` before anything is
//! derived from it, so an out-of-range page never produces an out-of-range
//! query offset.

use serde::Serialize;

/// Number of page links shown on either side of the current page.
pub const PAGE_WINDOW: i64 = 2;

/// One numbered link in the page window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub num: i64,
    pub active: bool,
}

/// Navigation state for one page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub limit: i64,
    /// Row offset derived from the clamped `page`.
    pub offset: i64,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: i64,
    pub next_page: i64,
    pub pages: Vec<PageLink>,
}

/// Compute the pagination for `page` over `total_count` rows.
///
/// A non-positive `limit` is treated as 1. There is always at least one
/// page, even for an empty listing.
///
/// # Examples
///
/// ```
/// use academy_core::pagination::paginate;
///
/// let p = paginate(99, 25, 10);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 20);
/// assert!(!p.has_next);
/// ```
pub fn paginate(page: i64, total_count: i64, limit: i64) -> Pagination {
    let limit = limit.max(1);
    let total_count = total_count.max(0);
    let total_pages = ((total_count + limit - 1) / limit).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - PAGE_WINDOW).max(1);
    let end = (page + PAGE_WINDOW).min(total_pages);
    let pages = (start..=end)
        .map(|num| PageLink {
            num,
            active: num == page,
        })
        .collect();

    Pagination {
        page,
        total_pages,
        total_count,
        limit,
        offset: (page - 1) * limit,
        has_prev: page > 1,
        has_next: page < total_pages,
        prev_page: (page - 1).max(1),
        next_page: (page + 1).min(total_pages),
        pages,
    }
}
