//! Pagination value types
//!
//! A [`Page`] is one fetch's worth of records plus pagination metadata;
//! a [`PageRequest`] is what the engine asks the remote side for.

use super::errors::DomainError;
use super::sort::SortSpec;

/// Page size used when the caller does not configure one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// One page of records
#[derive(Debug, Clone, PartialEq)]
pub struct Page<R> {
    items: Vec<R>,
    page_number: u32,
    page_size: u32,
    total_items: u64,
    total_pages: u32,
}

impl<R> Page<R> {
    /// Creates a page, validating the pagination invariants
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidPage`] when the page number is zero, the
    /// page size is zero, the page holds more items than its size,
    /// `total_items` would need more pages than fit in a `u32`, or
    /// `total_pages` disagrees with `ceil(total_items / page_size)`.
    pub fn new(
        items: Vec<R>,
        page_number: u32,
        page_size: u32,
        total_items: u64,
        total_pages: u32,
    ) -> Result<Self, DomainError> {
        if page_number == 0 {
            return Err(DomainError::InvalidPage(
                "page numbers are 1-based".to_string(),
            ));
        }
        if page_size == 0 {
            return Err(DomainError::InvalidPage(
                "page_size must be greater than 0".to_string(),
            ));
        }
        if items.len() > page_size as usize {
            return Err(DomainError::InvalidPage(format!(
                "{} items exceed page_size {}",
                items.len(),
                page_size
            )));
        }
        if total_items.div_ceil(u64::from(page_size)) > u64::from(u32::MAX) {
            return Err(DomainError::InvalidPage(format!(
                "total_items {} needs more than {} pages",
                total_items,
                u32::MAX
            )));
        }
        let expected = Self::total_pages_for(total_items, page_size);
        if total_pages != expected {
            return Err(DomainError::InvalidPage(format!(
                "total_pages {} does not match ceil({} / {}) = {}",
                total_pages, total_items, page_size, expected
            )));
        }

        Ok(Self {
            items,
            page_number,
            page_size,
            total_items,
            total_pages,
        })
    }

    /// Builds a single page holding an entire (already fetched) result set
    pub fn single(items: Vec<R>) -> Self {
        let len = items.len() as u64;
        let page_size = (items.len() as u32).max(1);
        Self {
            items,
            page_number: 1,
            page_size,
            total_items: len,
            total_pages: Self::total_pages_for(len, page_size),
        }
    }

    /// `ceil(total_items / page_size)`; zero when `page_size` is zero,
    /// saturating at `u32::MAX`
    pub fn total_pages_for(total_items: u64, page_size: u32) -> u32 {
        if page_size == 0 {
            return 0;
        }
        u32::try_from(total_items.div_ceil(u64::from(page_size))).unwrap_or(u32::MAX)
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn into_items(self) -> Vec<R> {
        self.items
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Returns true if pages after this one exist
    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

}

/// Parameters of a single page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub sort: SortSpec,
    /// Server-side name filter; `None` when no query is active
    pub filter: Option<String>,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32, sort: SortSpec) -> Self {
        Self {
            page,
            page_size,
            sort,
            filter: None,
        }
    }

    /// Sets the filter, treating a blank query as no filter
    pub fn with_filter(mut self, query: &str) -> Self {
        let trimmed = query.trim();
        self.filter = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_for() {
        assert_eq!(Page::<()>::total_pages_for(0, 20), 0);
        assert_eq!(Page::<()>::total_pages_for(1, 20), 1);
        assert_eq!(Page::<()>::total_pages_for(20, 20), 1);
        assert_eq!(Page::<()>::total_pages_for(21, 20), 2);
        assert_eq!(Page::<()>::total_pages_for(45, 20), 3);
        assert_eq!(Page::<()>::total_pages_for(5, 0), 0);
    }

    #[test]
    fn test_new_valid_page() {
        let page = Page::new(vec![1, 2, 3], 2, 3, 7, 3).unwrap();
        assert_eq!(page.items(), &[1, 2, 3]);
        assert_eq!(page.page_number(), 2);
        assert!(page.has_next());
    }

    #[test]
    fn test_new_rejects_zero_page_number() {
        assert!(matches!(
            Page::<u8>::new(vec![], 0, 20, 0, 0),
            Err(DomainError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_new_rejects_zero_page_size() {
        assert!(Page::<u8>::new(vec![], 1, 0, 0, 0).is_err());
    }

    #[test]
    fn test_new_rejects_oversized_page() {
        assert!(Page::new(vec![1, 2, 3], 1, 2, 3, 2).is_err());
    }

    #[test]
    fn test_new_rejects_inconsistent_total_pages() {
        assert!(Page::new(vec![1], 1, 20, 41, 2).is_err());
    }

    #[test]
    fn test_total_pages_for_saturates() {
        assert_eq!(Page::<()>::total_pages_for(u64::MAX, 1), u32::MAX);
    }

    #[test]
    fn test_new_rejects_page_count_beyond_u32() {
        let total = u64::from(u32::MAX) + 1;
        assert!(matches!(
            Page::<u8>::new(vec![], 1, 1, total, 0),
            Err(DomainError::InvalidPage(_))
        ));
        assert!(Page::<u8>::new(vec![], 1, 1, total, u32::MAX).is_err());
    }

    #[test]
    fn test_empty_last_page_is_valid() {
        let page = Page::<u8>::new(vec![], 1, 20, 0, 0).unwrap();
        assert!(!page.has_next());
    }

    #[test]
    fn test_single_page() {
        let page = Page::single(vec!["a", "b"]);
        assert_eq!(page.total_pages(), 1);
        assert_eq!(page.total_items(), 2);
        assert!(!page.has_next());

        let empty = Page::<u8>::single(vec![]);
        assert_eq!(empty.total_pages(), 0);
    }

    #[test]
    fn test_request_blank_filter_is_none() {
        let req = PageRequest::new(1, 20, SortSpec::default()).with_filter("   ");
        assert!(req.filter.is_none());

        let req = PageRequest::new(1, 20, SortSpec::default()).with_filter(" berk ");
        assert_eq!(req.filter.as_deref(), Some("berk"));
    }
}
