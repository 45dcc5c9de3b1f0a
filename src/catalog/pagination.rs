//! Local pagination over a fully fetched result set.
//!
//! # Design Decisions
//! - Pure arithmetic; no I/O, and `take` moves items out without cloning
//! - A page past the end is an empty window, never an error

use serde::Serialize;

/// The visible range of a result set for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    pub page: u32,
    pub limit: u32,
    pub total_items: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub total_pages: usize,
    pub has_more: bool,
    pub has_previous: bool,
}

impl PaginationWindow {
    /// Compute the window for `page` of size `limit` over `total_items`.
    ///
    /// `page` and `limit` below 1 are treated as 1.
    pub fn new(total_items: usize, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let size = limit as usize;

        let start_index = (page as usize - 1).saturating_mul(size).min(total_items);
        let end_index = start_index.saturating_add(size).min(total_items);

        Self {
            page,
            limit,
            total_items,
            start_index,
            end_index,
            total_pages: total_items.div_ceil(size),
            has_more: end_index < total_items,
            has_previous: page > 1,
        }
    }

    /// Number of items visible in this window.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take ownership of the window's items, discarding the rest.
    pub fn take<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.start_index)
            .take(self.len())
            .collect()
    }

    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta {
            current_page: self.page,
            limit: self.limit,
            total_results: self.total_items,
            total_pages: self.total_pages,
            has_more: self.has_more,
            has_previous: self.has_previous,
        }
    }
}

/// Pagination metadata returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub limit: u32,
    pub total_results: usize,
    pub total_pages: usize,
    pub has_more: bool,
    pub has_previous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_of_many() {
        let window = PaginationWindow::new(25, 1, 10);
        assert_eq!(window.len(), 10);
        assert_eq!(window.total_pages, 3);
        assert!(window.has_more);
        assert!(!window.has_previous);
    }

    #[test]
    fn test_last_partial_page() {
        let window = PaginationWindow::new(25, 3, 10);
        assert_eq!((window.start_index, window.end_index), (20, 25));
        assert_eq!(window.len(), 5);
        assert!(!window.has_more);
        assert!(window.has_previous);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let window = PaginationWindow::new(25, 4, 10);
        assert!(window.is_empty());
        assert!(!window.has_more);
        assert!(window.has_previous);
        assert_eq!(window.total_pages, 3);

        let items: Vec<u32> = (0..25).collect();
        assert!(window.take(items).is_empty());
    }

    #[test]
    fn test_empty_result_set() {
        let window = PaginationWindow::new(0, 1, 10);
        assert!(window.is_empty());
        assert_eq!(window.total_pages, 0);
        assert!(!window.has_more);
        assert!(!window.has_previous);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let window = PaginationWindow::new(5, u32::MAX, u32::MAX);
        assert!(window.is_empty());
        assert_eq!(window.total_pages, 1);
    }

    #[test]
    fn test_window_size_matches_formula() {
        for total in 0..40usize {
            for limit in 1..12u32 {
                for page in 1..8u32 {
                    let window = PaginationWindow::new(total, page, limit);
                    let skipped = (page as i64 - 1) * limit as i64;
                    let expected = (total as i64 - skipped).clamp(0, limit as i64) as usize;
                    assert_eq!(window.len(), expected, "total={total} page={page} limit={limit}");
                    assert_eq!(window.total_pages, total.div_ceil(limit as usize));
                    if total > 0 && page as usize == window.total_pages {
                        assert!(!window.has_more);
                    }
                }
            }
        }
    }

    #[test]
    fn test_take_preserves_order() {
        let items: Vec<String> = (0..12).map(|i| format!("item-{i}")).collect();
        let window = PaginationWindow::new(items.len(), 2, 5);
        assert_eq!(window.take(items), ["item-5", "item-6", "item-7", "item-8", "item-9"]);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PaginationWindow::new(25, 1, 10).meta();
        assert_eq!(
            serde_json::to_value(meta).unwrap(),
            serde_json::json!({
                "currentPage": 1,
                "limit": 10,
                "totalResults": 25,
                "totalPages": 3,
                "hasMore": true,
                "hasPrevious": false
            })
        );
    }
}
