//! Fixed-size pagination of ordered result sequences.

use serde::Serialize;

/// Page request parameters. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

/// One page of an ordered listing, ready to be inserted into a template
/// context.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: usize, pagination: Pagination) -> Self {
        let per_page = pagination.per_page.max(1);
        let total_pages = total.div_ceil(per_page).max(1);
        Self {
            items,
            page: pagination.page.max(1).min(total_pages),
            per_page,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_total_pages_rounding_up() {
        let page = Paginated::new(vec![1, 2, 3], 21, Pagination { page: 1, per_page: 10 });
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page, 1);
    }

    #[test]
    fn clamps_the_reported_page_to_the_last_one() {
        let page = Paginated::new(vec![1], 21, Pagination { page: 99, per_page: 10 });
        assert_eq!(page.page, 3);
    }

    #[test]
    fn empty_listing_still_has_one_page() {
        let page: Paginated<i32> = Paginated::new(vec![], 0, Pagination { page: 5, per_page: 10 });
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.page, 1);
    }
}
