//! Virtualized window over the display sequence.
//!
//! The renderer only ever addresses `page_size()` contiguous rows starting
//! at `starting_index()`, however large the total row count grows. Paging
//! moves in strides of `threshold - offset` so the edge event that
//! triggered a move lands slightly inside the new page and cannot refire
//! immediately.

use crate::error::EngineError;

/// Rows kept resident per page. Large enough that paging is imperceptible,
/// small enough to bound render cost.
pub const DEFAULT_PAGE_THRESHOLD: usize = 10_000;

/// Rows the viewport is nudged away from the edge after a page move.
pub const DEFAULT_PAGE_OFFSET: usize = 10;

/// Bounded page over a logical row sequence of arbitrary length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedWindow {
    starting_index: usize,
    threshold: usize,
    offset: usize,
    total_rows: usize,
}

impl PaginatedWindow {
    /// Create a window. Fails with `Configuration` unless
    /// `offset < threshold`; an offset at or above the threshold makes
    /// page-boundary detection oscillate.
    pub fn new(total_rows: usize, threshold: usize, offset: usize) -> Result<Self, EngineError> {
        if offset >= threshold {
            return Err(EngineError::Configuration { offset, threshold });
        }
        Ok(Self {
            starting_index: 0,
            threshold,
            offset,
            total_rows,
        })
    }

    /// Window with the default threshold and offset.
    pub fn with_defaults(total_rows: usize) -> Self {
        Self {
            starting_index: 0,
            threshold: DEFAULT_PAGE_THRESHOLD,
            offset: DEFAULT_PAGE_OFFSET,
            total_rows,
        }
    }

    /// First row the renderer may address.
    pub fn starting_index(&self) -> usize {
        self.starting_index
    }

    /// Number of rows resident in the current page, capped at the
    /// threshold.
    pub fn page_size(&self) -> usize {
        self.threshold.min(self.total_rows - self.starting_index)
    }

    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Whether a row is addressable in the current page.
    pub fn contains(&self, row: usize) -> bool {
        row >= self.starting_index && row < self.starting_index + self.page_size()
    }

    /// Advance one page. Returns false (no-op) when already on the final
    /// page.
    pub fn scroll_to_next_page(&mut self) -> bool {
        let next = (self.starting_index + self.stride()).min(self.max_start());
        if next == self.starting_index {
            return false;
        }
        self.starting_index = next;
        true
    }

    /// Retreat one page. Returns false (no-op) when already at the start.
    pub fn scroll_to_prev_page(&mut self) -> bool {
        let prev = self.starting_index.saturating_sub(self.stride());
        if prev == self.starting_index {
            return false;
        }
        self.starting_index = prev;
        true
    }

    /// Jump straight to the page containing `row`, in O(1).
    ///
    /// Returns the row's offset within the repositioned page so the
    /// renderer can scroll to it directly. Rows outside `[0, total_rows)`
    /// are rejected, not clamped.
    pub fn scroll_to_line(&mut self, row: usize) -> Result<usize, EngineError> {
        if row >= self.total_rows {
            return Err(EngineError::IndexOutOfBounds {
                index: row,
                total_rows: self.total_rows,
            });
        }
        let page = row / self.stride();
        self.starting_index = (page * self.stride()).min(self.max_start());
        Ok(row - self.starting_index)
    }

    /// Track a new total after the display sequence was rebuilt,
    /// re-clamping the page start.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        self.starting_index = self.starting_index.min(self.max_start());
    }

    // Strictly positive: construction guarantees offset < threshold.
    fn stride(&self) -> usize {
        self.threshold - self.offset
    }

    fn max_start(&self) -> usize {
        self.total_rows.saturating_sub(self.threshold)
    }
}
