//! Page splitting for post listings.
//!
//! A [`Paginator`] knows the total number of items and the page size; it
//! resolves a requested page number (usually the raw `?page=` query value)
//! to a valid page and builds [`Page`] values that templates can render.

use serde::Serialize;

/// Number of posts shown on one listing page.
pub const POSTS_PER_PAGE: u32 = 10;

/// Splits a collection of `count` items into pages of `per_page` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    count: u64,
    per_page: u32,
}

impl Paginator {
    /// Create a paginator. A `per_page` of zero is treated as one.
    pub fn new(count: u64, per_page: u32) -> Self {
        Self {
            count,
            per_page: per_page.max(1),
        }
    }

    /// Total number of items.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Items per page.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of pages. An empty collection still has one (empty) page.
    pub fn num_pages(&self) -> u32 {
        let pages = self.count.div_ceil(u64::from(self.per_page)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Resolve a requested page number.
    ///
    /// Missing or non-integer values give the first page; out of range
    /// values are clamped to the first or last page.
    pub fn page_number(&self, requested: Option<&str>) -> u32 {
        let Some(raw) = requested.map(str::trim) else {
            return 1;
        };
        let number = match raw.parse::<i64>() {
            Ok(number) => number,
            // Integers beyond i64 are still out of range, not garbage.
            Err(_) if is_integer(raw) => {
                return if raw.starts_with('-') {
                    1
                } else {
                    self.num_pages()
                };
            }
            Err(_) => return 1,
        };

        if number < 1 {
            1
        } else if number > i64::from(self.num_pages()) {
            self.num_pages()
        } else {
            // In range, so it fits in u32.
            number as u32
        }
    }

    /// Zero-based offset of the first item on page `number`.
    pub fn offset(&self, number: u32) -> u64 {
        u64::from(number.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Wrap the items of page `number` (already fetched) into a [`Page`].
    pub fn page<T>(&self, number: u32, object_list: Vec<T>) -> Page<T> {
        let num_pages = self.num_pages();
        let number = number.clamp(1, num_pages);
        let has_next = number < num_pages;
        let has_previous = number > 1;

        let (start_index, end_index) = if self.count == 0 {
            (0, 0)
        } else {
            let offset = self.offset(number);
            (offset + 1, offset + object_list.len() as u64)
        };

        Page {
            object_list,
            number,
            num_pages,
            count: self.count,
            has_next,
            has_previous,
            next_page_number: has_next.then_some(number + 1),
            previous_page_number: has_previous.then_some(number - 1),
            start_index,
            end_index,
        }
    }

    /// Paginate an in-memory sequence and return the requested page.
    pub fn paginate<T>(items: Vec<T>, per_page: u32, requested: Option<&str>) -> Page<T> {
        let paginator = Self::new(items.len() as u64, per_page);
        let number = paginator.page_number(requested);
        let offset = paginator.offset(number) as usize;

        let object_list = items
            .into_iter()
            .skip(offset)
            .take(paginator.per_page as usize)
            .collect();
        paginator.page(number, object_list)
    }
}

/// One page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page.
    pub object_list: Vec<T>,
    /// 1-based page number.
    pub number: u32,
    /// Total number of pages.
    pub num_pages: u32,
    /// Total number of items across all pages.
    pub count: u64,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<u32>,
    pub previous_page_number: Option<u32>,
    /// 1-based index of the first item on this page (0 when empty).
    pub start_index: u64,
    /// 1-based index of the last item on this page (0 when empty).
    pub end_index: u64,
}

impl<T> Page<T> {
    /// Number of items on this page.
    pub fn len(&self) -> usize {
        self.object_list.len()
    }

    /// Check whether this page has no items.
    pub fn is_empty(&self) -> bool {
        self.object_list.is_empty()
    }

    /// Check whether the page has other pages around it.
    pub fn has_other_pages(&self) -> bool {
        self.has_next || self.has_previous
    }
}

/// Optional sign followed by ASCII digits only.
fn is_integer(raw: &str) -> bool {
    let digits = raw.strip_prefix(['-', '+']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_pages() {
        assert_eq!(Paginator::new(0, 10).num_pages(), 1);
        assert_eq!(Paginator::new(1, 10).num_pages(), 1);
        assert_eq!(Paginator::new(10, 10).num_pages(), 1);
        assert_eq!(Paginator::new(11, 10).num_pages(), 2);
        assert_eq!(Paginator::new(13, 10).num_pages(), 2);
    }

    #[test]
    fn test_zero_per_page() {
        let paginator = Paginator::new(3, 0);
        assert_eq!(paginator.per_page(), 1);
        assert_eq!(paginator.num_pages(), 3);
    }

    #[test]
    fn test_page_number_parsing() {
        let paginator = Paginator::new(25, 10);

        assert_eq!(paginator.page_number(None), 1);
        assert_eq!(paginator.page_number(Some("")), 1);
        assert_eq!(paginator.page_number(Some("abc")), 1);
        assert_eq!(paginator.page_number(Some("2")), 2);
        assert_eq!(paginator.page_number(Some(" 3 ")), 3);
    }

    #[test]
    fn test_page_number_clamping() {
        let paginator = Paginator::new(25, 10);

        assert_eq!(paginator.page_number(Some("0")), 1);
        assert_eq!(paginator.page_number(Some("-4")), 1);
        assert_eq!(paginator.page_number(Some("4")), 3);
        assert_eq!(paginator.page_number(Some("99999999999999")), 3);
    }

    #[test]
    fn test_page_number_beyond_i64() {
        let paginator = Paginator::new(25, 10);

        assert_eq!(paginator.page_number(Some("99999999999999999999")), 3);
        assert_eq!(paginator.page_number(Some("+99999999999999999999")), 3);
        assert_eq!(paginator.page_number(Some("-99999999999999999999")), 1);
        assert_eq!(paginator.page_number(Some("9999999999999999999x")), 1);
        assert_eq!(paginator.page_number(Some("-")), 1);

        let items: Vec<u32> = (1..=13).collect();
        let page = Paginator::paginate(items, POSTS_PER_PAGE, Some("99999999999999999999"));
        assert_eq!(page.number, 2);
    }

    #[test]
    fn test_offset() {
        let paginator = Paginator::new(25, 10);
        assert_eq!(paginator.offset(1), 0);
        assert_eq!(paginator.offset(3), 20);
    }

    #[test]
    fn test_paginate_thirteen_items() {
        let items: Vec<u32> = (1..=13).collect();

        let first = Paginator::paginate(items.clone(), POSTS_PER_PAGE, None);
        assert_eq!(first.len(), 10);
        assert_eq!(first.number, 1);
        assert_eq!(first.num_pages, 2);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.next_page_number, Some(2));
        assert_eq!(first.previous_page_number, None);
        assert_eq!((first.start_index, first.end_index), (1, 10));

        let second = Paginator::paginate(items, POSTS_PER_PAGE, Some("2"));
        assert_eq!(second.object_list, vec![11, 12, 13]);
        assert!(!second.has_next);
        assert!(second.has_previous);
        assert_eq!(second.previous_page_number, Some(1));
        assert_eq!((second.start_index, second.end_index), (11, 13));
    }

    #[test]
    fn test_paginate_out_of_range_gives_last_page() {
        let items: Vec<u32> = (1..=13).collect();
        let page = Paginator::paginate(items, POSTS_PER_PAGE, Some("7"));

        assert_eq!(page.number, 2);
        assert_eq!(page.len(), 3);
    }

    #[test]
    fn test_paginate_empty() {
        let page = Paginator::paginate(Vec::<u32>::new(), POSTS_PER_PAGE, Some("5"));

        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert_eq!(page.count, 0);
        assert!(page.is_empty());
        assert!(!page.has_other_pages());
        assert_eq!((page.start_index, page.end_index), (0, 0));
    }

    #[test]
    fn test_page_serializes() {
        let page = Paginator::paginate(vec!["a", "b"], POSTS_PER_PAGE, None);
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["object_list"], serde_json::json!(["a", "b"]));
        assert_eq!(json["number"], 1);
        assert_eq!(json["has_next"], false);
        assert_eq!(json["next_page_number"], serde_json::Value::Null);
    }
}
