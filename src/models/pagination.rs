//! Pagination primitives shared across list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl Pagination {
    /// Maximum items per page.
    const MAX_PER_PAGE: usize = 100;

    /// Default items per page.
    const DEFAULT_PER_PAGE: usize = 25;

    pub fn limit(&self) -> usize {
        self.per_page
            .unwrap_or(Self::DEFAULT_PER_PAGE)
            .clamp(1, Self::MAX_PER_PAGE)
    }

    pub fn offset(&self) -> usize {
        (self.current_page() - 1) * self.limit()
    }

    pub fn current_page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }
}

/// Paged result envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

impl<T: Serialize> PagedResult<T> {
    /// Slice one page out of the full, already-filtered item list.
    pub fn paginate(all: Vec<T>, pagination: &Pagination) -> Self {
        let total = all.len();
        let per_page = pagination.limit();
        let items: Vec<T> = all
            .into_iter()
            .skip(pagination.offset())
            .take(per_page)
            .collect();
        Self {
            items,
            total,
            page: pagination.current_page(),
            per_page,
            total_pages: total.div_ceil(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        let p = Pagination::default();
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.current_page(), 1);
    }

    #[test]
    fn pagination_clamps_per_page() {
        let p = Pagination {
            page: Some(1),
            per_page: Some(500),
        };
        assert_eq!(p.limit(), 100);
    }

    #[test]
    fn pagination_offset_calculation() {
        let p = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(p.offset(), 20);
    }

    #[test]
    fn paginate_slices_requested_page() {
        let p = Pagination {
            page: Some(2),
            per_page: Some(3),
        };
        let result = PagedResult::paginate((1..=10).collect(), &p);
        assert_eq!(result.items, vec![4, 5, 6]);
        assert_eq!(result.total, 10);
        assert_eq!(result.total_pages, 4);
        assert_eq!(result.page, 2);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let p = Pagination {
            page: Some(5),
            per_page: Some(10),
        };
        let result = PagedResult::paginate(vec![1, 2, 3], &p);
        assert!(result.items.is_empty());
        assert_eq!(result.total, 3);
        assert_eq!(result.total_pages, 1);
    }
}
