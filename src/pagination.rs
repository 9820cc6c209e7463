// src/pagination.rs

use serde::{Deserialize, Serialize};

/// Query parameters accepted by every paginated listing.
///
/// `page` is kept as a raw string: garbage must fall back to the first page
/// instead of being rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// One window of a listing plus the metadata the paginator partial needs.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<i64>,
    pub next_page_number: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    pub count: i64,
    pub per_page: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    /// An empty listing still has one (empty) page.
    pub fn num_pages(&self) -> i64 {
        if self.count == 0 {
            1
        } else {
            (self.count + self.per_page - 1) / self.per_page
        }
    }

    /// Lenient page lookup: non-numbers give the first page, anything out of
    /// range gives the last one.
    pub fn resolve(&self, requested: Option<&str>) -> i64 {
        let Some(number) = requested.and_then(|raw| raw.trim().parse::<i64>().ok()) else {
            return 1;
        };
        let last = self.num_pages();
        if number < 1 || number > last {
            last
        } else {
            number
        }
    }

    pub fn offset(&self, number: i64) -> i64 {
        (number - 1) * self.per_page
    }

    pub fn page<T>(&self, number: i64, items: Vec<T>) -> Page<T> {
        let num_pages = self.num_pages();
        let has_previous = number > 1;
        let has_next = number < num_pages;
        Page {
            items,
            number,
            num_pages,
            count: self.count,
            has_previous,
            has_next,
            previous_page_number: has_previous.then(|| number - 1),
            next_page_number: has_next.then(|| number + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_listing_has_one_page() {
        let paginator = Paginator::new(0, 10);
        assert_eq!(paginator.num_pages(), 1);
        assert_eq!(paginator.resolve(Some("3")), 1);
    }

    #[test]
    fn partial_last_page_counts() {
        assert_eq!(Paginator::new(11, 10).num_pages(), 2);
        assert_eq!(Paginator::new(10, 10).num_pages(), 1);
        assert_eq!(Paginator::new(26, 5).num_pages(), 6);
    }

    #[test]
    fn resolve_is_lenient() {
        let paginator = Paginator::new(25, 10);
        assert_eq!(paginator.resolve(None), 1);
        assert_eq!(paginator.resolve(Some("abc")), 1);
        assert_eq!(paginator.resolve(Some("2")), 2);
        assert_eq!(paginator.resolve(Some("99")), 3);
        assert_eq!(paginator.resolve(Some("0")), 3);
    }

    #[test]
    fn page_metadata() {
        let paginator = Paginator::new(25, 10);
        assert_eq!(paginator.offset(3), 20);

        let first = paginator.page(1, vec![1, 2, 3]);
        assert!(!first.has_previous);
        assert_eq!(first.next_page_number, Some(2));

        let last = paginator.page(3, Vec::<i32>::new());
        assert!(!last.has_next);
        assert_eq!(last.previous_page_number, Some(2));
        assert_eq!(last.count, 25);
    }
}
