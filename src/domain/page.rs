use serde::{Deserialize, Serialize};

/// Number of rows per page in transaction and transfer listings.
pub const DEFAULT_PAGE_SIZE: usize = 15;

/// One page of a listing. Pages are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
}

impl<T> Page<T> {
    /// Cut page `page` out of an already ordered list. Page 0 is treated as
    /// page 1; a page past the end is empty but still reports the total.
    pub fn slice(all: Vec<T>, page: usize, per_page: usize) -> Self {
        let page = page.max(1);
        let per_page = per_page.max(1);
        let total = all.len();

        let items = all
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Self {
            items,
            page,
            per_page,
            total,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_middle_page() {
        let page = Page::slice((1..=40).collect::<Vec<_>>(), 2, 15);
        assert_eq!(page.items.first(), Some(&16));
        assert_eq!(page.items.len(), 15);
        assert_eq!(page.total, 40);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
    }

    #[test]
    fn test_slice_last_and_past_end() {
        let last = Page::slice((1..=40).collect::<Vec<_>>(), 3, 15);
        assert_eq!(last.items, (31..=40).collect::<Vec<_>>());
        assert!(!last.has_next());

        let past = Page::slice((1..=40).collect::<Vec<_>>(), 9, 15);
        assert!(past.items.is_empty());
        assert_eq!(past.total, 40);
    }

    #[test]
    fn test_slice_empty_and_page_zero() {
        let page = Page::slice(Vec::<u8>::new(), 0, 15);
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
    }
}
