//! Circular pagination helpers.
//!
//! Pure functions used by loaders to slice an ordered collection into
//! fixed-size pages. No state is kept here; the current page lives in the
//! frame's local data and the page count is recomputed on every render.

use serde::{Deserialize, Serialize};

/// Direction of a page-arrow navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Back,
    Forward,
}

/// A derived window over an ordered collection.
///
/// Never persisted: reconstructed from `(item_count, page_size,
/// current_page)` on every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub start: usize,
    pub end: usize,
    pub current_page: usize,
    pub page_count: usize,
}

impl PageWindow {
    /// Computes the window for `current_page` over `item_count` items.
    ///
    /// `current_page` is clamped into `1..=max(page_count, 1)` so a stale
    /// page number (items removed since the page was stored) still yields
    /// a valid window instead of an empty render.
    pub fn new(item_count: usize, page_size: usize, current_page: usize) -> Self {
        let page_count = page_count(item_count, page_size);
        let current_page = current_page.clamp(1, page_count.max(1));
        let start = (current_page - 1) * page_size;
        let end = (start + page_size).min(item_count);
        Self {
            start,
            end,
            current_page,
            page_count,
        }
    }

    /// Page count as shown to the user: 0 and 1 both display as a single
    /// page so an empty collection never renders "page 1 / 0".
    pub fn display_page_count(&self) -> usize {
        self.page_count.max(1)
    }
}

/// `ceil(item_count / page_size)`. Zero when the collection is empty;
/// callers treat 0 and 1 as the same "single empty page" for display.
pub fn page_count(item_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    item_count.div_ceil(page_size)
}

/// Circular page advance: stepping forward from the last page wraps to
/// page 1, stepping back from page 1 wraps to the last page.
pub fn advance(current_page: usize, page_count: usize, direction: PageDirection) -> usize {
    let last = page_count.max(1);
    match direction {
        PageDirection::Forward => {
            if current_page >= last {
                1
            } else {
                current_page + 1
            }
        }
        PageDirection::Back => {
            if current_page <= 1 {
                last
            } else {
                current_page - 1
            }
        }
    }
}

/// Slice of `items` belonging to `current_page`, end index clamped.
pub fn slice<T>(items: &[T], page_size: usize, current_page: usize) -> &[T] {
    let window = PageWindow::new(items.len(), page_size, current_page);
    &items[window.start..window.end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_bounds() {
        // page_count * page_size >= item_count and
        // (page_count - 1) * page_size < item_count for item_count > 0
        for item_count in 1..=100usize {
            for page_size in 1..=20usize {
                let pages = page_count(item_count, page_size);
                assert!(pages * page_size >= item_count);
                assert!((pages - 1) * page_size < item_count);
            }
        }
    }

    #[test]
    fn test_page_count_empty() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(PageWindow::new(0, 10, 1).display_page_count(), 1);
    }

    #[test]
    fn test_advance_round_trips() {
        // N forward steps then N backward steps restores the page
        for pages in 1..=7usize {
            for start in 1..=pages {
                for n in 0..=15usize {
                    let mut page = start;
                    for _ in 0..n {
                        page = advance(page, pages, PageDirection::Forward);
                    }
                    for _ in 0..n {
                        page = advance(page, pages, PageDirection::Back);
                    }
                    assert_eq!(page, start);
                }
            }
        }
    }

    #[test]
    fn test_advance_wraps() {
        assert_eq!(advance(3, 3, PageDirection::Forward), 1);
        assert_eq!(advance(1, 3, PageDirection::Back), 3);
        // single page cycles to itself
        assert_eq!(advance(1, 1, PageDirection::Forward), 1);
        assert_eq!(advance(1, 0, PageDirection::Back), 1);
    }

    #[test]
    fn test_slice_clamps_last_page() {
        let items: Vec<u32> = (0..23).collect();
        assert_eq!(slice(&items, 10, 1), &items[0..10]);
        assert_eq!(slice(&items, 10, 3), &items[20..23]);
    }

    #[test]
    fn test_window_clamps_stale_page() {
        // page 5 stored, but only 12 items remain at page size 10
        let window = PageWindow::new(12, 10, 5);
        assert_eq!(window.current_page, 2);
        assert_eq!(window.start, 10);
        assert_eq!(window.end, 12);
    }
}
