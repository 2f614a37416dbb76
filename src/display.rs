//! Builds the display sequence from matches, bookmarks, and expansions.
//!
//! The builder scans absolute line indices in order and compacts every
//! maximal run of hidden lines into a single collapsed marker, so the
//! renderer can show true line numbers without materializing hidden rows.

use std::cmp::Ordering;
use std::collections::HashSet;

/// A single display row: either one visible line or a collapsed run of
/// hidden lines. Rebuilt fresh on every recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessedLine {
    /// A visible line, referencing its absolute index in the store.
    Single(usize),
    /// A maximal run of hidden lines, inclusive on both ends.
    Collapsed { start: usize, end: usize },
}

impl ProcessedLine {
    /// The absolute line number for a visible row, `None` for a marker.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            ProcessedLine::Single(n) => Some(*n),
            ProcessedLine::Collapsed { .. } => None,
        }
    }
}

/// Ordered set of disjoint, non-adjacent inclusive ranges the user has
/// explicitly revealed. Always normalized: sorted ascending by start,
/// touching or overlapping ranges merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedRanges {
    ranges: Vec<(usize, usize)>,
}

impl ExpandedRanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reveal an inclusive range. Idempotent: inserting a range that is
    /// already covered leaves the set unchanged.
    pub fn insert(&mut self, start: usize, end: usize) {
        if start > end {
            return;
        }
        self.ranges.push((start, end));
        self.normalize();
    }

    /// Re-collapse the range at `index` (position in the normalized set).
    pub fn remove(&mut self, index: usize) -> Option<(usize, usize)> {
        if index < self.ranges.len() {
            Some(self.ranges.remove(index))
        } else {
            None
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.ranges
            .binary_search_by(|&(start, end)| {
                if end < line {
                    Ordering::Less
                } else if start > line {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .is_ok()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn as_slice(&self) -> &[(usize, usize)] {
        &self.ranges
    }

    /// Sort and merge touching or overlapping ranges.
    fn normalize(&mut self) {
        self.ranges.sort_unstable();
        let mut merged: Vec<(usize, usize)> = Vec::with_capacity(self.ranges.len());
        for &(start, end) in &self.ranges {
            match merged.last_mut() {
                // Touching counts as mergeable: (0,2) + (3,5) -> (0,5)
                Some(last) if start <= last.1 + 1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }
        self.ranges = merged;
    }
}

/// Build the display sequence for the current session state.
///
/// A line is visible iff there is no active filtering, or it matched the
/// filters, or it is bookmarked, shared, or inside an expanded range.
/// With `expandable_rows` off, hidden runs are omitted instead of marked.
pub fn build_display_lines(
    line_count: usize,
    matching: Option<&HashSet<usize>>,
    bookmarks: &HashSet<usize>,
    share_line: Option<usize>,
    expanded: &ExpandedRanges,
    expandable_rows: bool,
) -> Vec<ProcessedLine> {
    let mut rows = Vec::new();
    let mut hidden_run: Option<usize> = None;

    for idx in 0..line_count {
        let visible = match matching {
            None => true,
            Some(set) => {
                set.contains(&idx)
                    || bookmarks.contains(&idx)
                    || share_line == Some(idx)
                    || expanded.contains(idx)
            }
        };

        if visible {
            if let Some(start) = hidden_run.take() {
                if expandable_rows {
                    rows.push(ProcessedLine::Collapsed {
                        start,
                        end: idx - 1,
                    });
                }
            }
            rows.push(ProcessedLine::Single(idx));
        } else if hidden_run.is_none() {
            hidden_run = Some(idx);
        }
    }

    if let Some(start) = hidden_run {
        if expandable_rows {
            rows.push(ProcessedLine::Collapsed {
                start,
                end: line_count - 1,
            });
        }
    }

    rows
}

/// Locate the display row containing an absolute line number.
///
/// Rows are ordered by line number, so this is a binary search; a line
/// hidden with `expandable_rows` off has no row and returns `None`.
pub fn display_index_of(processed: &[ProcessedLine], line: usize) -> Option<usize> {
    processed
        .binary_search_by(|row| match row {
            ProcessedLine::Single(n) => n.cmp(&line),
            ProcessedLine::Collapsed { start, end } => {
                if *end < line {
                    Ordering::Less
                } else if *start > line {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            }
        })
        .ok()
}
