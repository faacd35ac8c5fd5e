// crates/jpostdb-core/src/pagination.rs
use serde::{Deserialize, Serialize};

/// Page position of a search as last agreed with the server.
///
/// `page` is 1-based. `page_size` and `page` are overwritten by the server's
/// answer after every successful search, so an out-of-range page requested
/// locally is clamped by whatever the server reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationState {
    pub page: u32,
    pub page_size: u32,
    pub total: u64,
}

impl PaginationState {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            total: 0,
        }
    }

    /// `max(1, ceil(total / page_size))`, or `0` when `page_size` is zero.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.page_size)).max(1)
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }

    pub fn has_prev_page(&self) -> bool {
        self.page > 1
    }

    /// Zero-based index of the first item on the current page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(page: u32, page_size: u32, total: u64) -> PaginationState {
        PaginationState {
            page,
            page_size,
            total,
        }
    }

    #[test]
    fn total_pages_matches_ceiling_with_floor_of_one() {
        for page_size in 1..=15u32 {
            for total in 0..=60u64 {
                let p = state(1, page_size, total);
                let ps = u64::from(page_size);
                let expected = ((total + ps - 1) / ps).max(1);
                assert_eq!(p.total_pages(), expected, "total={total} size={page_size}");
            }
        }
    }

    #[test]
    fn zero_page_size_has_no_pages() {
        let p = state(1, 0, 40);
        assert_eq!(p.total_pages(), 0);
        assert!(!p.has_next_page());
    }

    #[test]
    fn has_next_page_iff_page_below_total_pages() {
        for page in 1..=5u32 {
            let p = state(page, 12, 25);
            assert_eq!(p.has_next_page(), u64::from(page) < 3, "page={page}");
        }
    }

    #[test]
    fn empty_result_is_a_single_page() {
        let p = state(1, 12, 0);
        assert_eq!(p.total_pages(), 1);
        assert!(!p.has_next_page());
        assert!(!p.has_prev_page());
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(state(1, 12, 100).offset(), 0);
        assert_eq!(state(3, 12, 100).offset(), 24);
    }
}
