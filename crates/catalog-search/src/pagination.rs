//! Page arithmetic for search results.

use serde::{Deserialize, Serialize};

/// Default number of results per page.
pub const DEFAULT_PAGE_SIZE: u32 = 24;

/// Pagination info.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Current page (1-indexed).
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Total number of matching items.
    pub total: usize,
    /// Total number of pages, `ceil(total / page_size)`.
    pub total_pages: usize,
}

impl Pagination {
    /// Create pagination info. Zero page and page size are raised to 1.
    pub fn new(page: u32, page_size: u32, total: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page: page.max(1),
            page_size,
            total,
            total_pages: total.div_ceil(page_size as usize),
        }
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }

    /// The items of this page; empty when the page is past the end.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Vec<T> {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.page_size as usize).min(items.len());
        items[start..end].to_vec()
    }

    /// Whether there's a next page.
    pub fn has_next(&self) -> bool {
        (self.page as usize) < self.total_pages
    }

    /// Get start item number (1-indexed), 0 when the page is empty.
    pub fn start_item(&self) -> usize {
        if self.offset() >= self.total {
            0
        } else {
            self.offset() + 1
        }
    }

    /// Get end item number.
    pub fn end_item(&self) -> usize {
        (self.offset() + self.page_size as usize).min(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_page_of_twenty_five() {
        let items: Vec<usize> = (0..25).collect();
        let p = Pagination::new(2, 10, items.len());

        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset(), 10);
        assert_eq!(p.slice(&items), (10..20).collect::<Vec<_>>());
        assert!(p.has_next());
    }

    #[test]
    fn test_last_partial_page() {
        let items: Vec<usize> = (0..25).collect();
        let p = Pagination::new(3, 10, items.len());
        assert_eq!(p.slice(&items), vec![20, 21, 22, 23, 24]);
        assert!(!p.has_next());
        assert_eq!(p.start_item(), 21);
        assert_eq!(p.end_item(), 25);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let items: Vec<usize> = (0..5).collect();
        let p = Pagination::new(4, 10, items.len());
        assert!(p.slice(&items).is_empty());
        assert_eq!(p.start_item(), 0);
    }

    #[test]
    fn test_empty_result_has_zero_pages() {
        let p = Pagination::new(1, 24, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next());
    }

    #[test]
    fn test_zero_inputs_are_clamped() {
        let p = Pagination::new(0, 0, 3);
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 1);
        assert_eq!(p.total_pages, 3);
    }
}
