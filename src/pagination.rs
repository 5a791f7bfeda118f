use serde::{Deserialize, Serialize};

use crate::domain::filter::DEFAULT_PAGE_SIZE;

/// Number of page buttons shown by the pager before it starts truncating.
pub const DEFAULT_MAX_VISIBLE: usize = 7;

/// Computes the page tokens rendered by the pager.
///
/// `Some(n)` is a page button, `None` an ellipsis. When the range is
/// truncated the first and last page are always present. `current_page`
/// must already be clamped to `1..=total_pages`.
pub fn compute_window(
    current_page: usize,
    total_pages: usize,
    max_visible: usize,
) -> Vec<Option<usize>> {
    if total_pages <= max_visible {
        return (1..=total_pages).map(Some).collect();
    }

    let side = max_visible / 2;
    let mut start = current_page.saturating_sub(side).max(1);
    let mut end = (current_page + side).min(total_pages);

    if current_page <= side {
        end = max_visible;
    }
    if current_page > total_pages - side {
        start = total_pages - max_visible + 1;
    }

    let mut pages = Vec::with_capacity(max_visible + 4);

    if start > 1 {
        pages.push(Some(1));
        if start > 2 {
            pages.push(None);
        }
    }

    pages.extend((start..=end).map(Some));

    if end < total_pages {
        if end < total_pages - 1 {
            pages.push(None);
        }
        pages.push(Some(total_pages));
    }

    pages
}

/// Pagination block reported alongside a page of results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Derives page count and navigation flags from the raw counts.
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Block used when a listing could not be loaded.
    pub fn empty() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE, 0)
    }
}

impl Default for PaginationMeta {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Pager tokens; empty when there is nothing to page through.
    pub pages: Vec<Option<usize>>,
    pub page: usize,
    pub pagination: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, pagination: PaginationMeta) -> Self {
        let page = pagination.page.min(pagination.total_pages).max(1);

        let pages = if pagination.total_pages <= 1 {
            vec![]
        } else {
            compute_window(page, pagination.total_pages, DEFAULT_MAX_VISIBLE)
        };

        Self {
            items,
            pages,
            page,
            pagination,
        }
    }
}
