//! Fixed-size pages over the history.

use crate::error::HistoryError;

/// Records shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 3;

/// Number of pages needed for `total` items.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// One page of items, borrowed from the history.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    /// 1-based page number.
    pub number: usize,
    /// Total number of pages.
    pub count: usize,
    pub items: &'a [T],
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.count
    }
}

/// Slice `items` into page `number`.
///
/// Page 1 of an empty sequence is valid and empty; any other number outside
/// `[1, page_count]` is rejected.
pub fn paginate<T>(items: &[T], number: usize, page_size: usize) -> Result<Page<'_, T>, HistoryError> {
    let count = page_count(items.len(), page_size);
    let last = count.max(1);
    if number == 0 || number > last {
        return Err(HistoryError::PageOutOfRange {
            requested: number,
            count,
        });
    }
    let start = (number - 1) * page_size;
    let end = (start + page_size).min(items.len());
    Ok(Page {
        number,
        count,
        items: &items[start.min(end)..end],
    })
}

/// Cursor over pages that never leaves `[1, page_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: usize,
    page_size: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Self {
            current: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Advance one page. Returns `false` and stays put on the last page.
    pub fn next(&mut self, total: usize) -> bool {
        if self.current < page_count(total, self.page_size) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page. Returns `false` and stays put on page 1.
    pub fn prev(&mut self) -> bool {
        if self.current > 1 {
            self.current -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to `number` if it is a valid page for `total` items.
    pub fn go_to(&mut self, number: usize, total: usize) -> bool {
        if number >= 1 && number <= page_count(total, self.page_size).max(1) {
            self.current = number;
            true
        } else {
            false
        }
    }

    /// Pull the cursor back into range after the item count shrank.
    pub fn clamp(&mut self, total: usize) {
        let last = page_count(total, self.page_size).max(1);
        self.current = self.current.clamp(1, last);
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
