//! Result pagination
//!
//! Follows the browse listing's paging rules: a page parameter that is not a
//! number means page 1, any number outside `1..=num_pages` (zero and
//! negatives included) means the last page.

use std::num::IntErrorKind;
use std::ops::Range;

/// Records per page when not configured
pub const DEFAULT_PER_PAGE: usize = 10;

/// Splits result sets into fixed-size pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PER_PAGE)
    }
}

impl Paginator {
    /// A page size of zero is treated as one
    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Resolve the requested page for a result of `total` items
    pub fn page(&self, total: usize, requested: Option<&str>) -> Page {
        let num_pages = total.div_ceil(self.per_page).max(1);
        let number = match requested.map(|p| p.trim().parse::<i64>()) {
            Some(Err(e)) if is_overflow(e.kind()) => num_pages,
            None | Some(Err(_)) => 1,
            Some(Ok(n)) => usize::try_from(n)
                .ok()
                .filter(|n| (1..=num_pages).contains(n))
                .unwrap_or(num_pages),
        };
        Page {
            number,
            num_pages,
            per_page: self.per_page,
            total,
        }
    }
}

fn is_overflow(kind: &IntErrorKind) -> bool {
    matches!(kind, IntErrorKind::PosOverflow | IntErrorKind::NegOverflow)
}

/// One page of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    pub num_pages: usize,
    pub per_page: usize,
    /// Items across all pages
    pub total: usize,
}

impl Page {
    /// Index range of this page's items
    pub fn range(&self) -> Range<usize> {
        let start = ((self.number - 1) * self.per_page).min(self.total);
        let end = (start + self.per_page).min(self.total);
        start..end
    }

    /// The items of this page
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.range();
        &items[range.start.min(items.len())..range.end.min(items.len())]
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_by_default() {
        let page = Paginator::default().page(25, None);
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 3);
        assert_eq!(page.range(), 0..10);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_non_numeric_page_is_first() {
        assert_eq!(Paginator::default().page(25, Some("abc")).number, 1);
        assert_eq!(Paginator::default().page(25, Some("")).number, 1);
        assert_eq!(Paginator::default().page(25, Some(" 2 ")).number, 2);
    }

    #[test]
    fn test_zero_and_negative_pages_are_last() {
        assert_eq!(Paginator::default().page(25, Some("0")).number, 3);
        assert_eq!(Paginator::default().page(25, Some("-2")).number, 3);
        assert_eq!(Paginator::default().page(0, Some("-1")).number, 1);
        assert_eq!(
            Paginator::default()
                .page(25, Some("99999999999999999999999"))
                .number,
            3
        );
    }

    #[test]
    fn test_out_of_range_is_last() {
        let page = Paginator::default().page(25, Some("9999"));
        assert_eq!(page.number, 3);
        assert_eq!(page.range(), 20..25);
        assert!(!page.has_next());
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let page = Paginator::new(0).page(0, Some("2"));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert!(page.slice::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_slice() {
        let items: Vec<u32> = (0..12).collect();
        let page = Paginator::new(5).page(items.len(), Some("3"));
        assert_eq!(page.slice(&items), &[10, 11]);
    }
}
