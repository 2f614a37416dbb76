//! Append-only store of raw log lines.
//!
//! Absolute line indices are assigned at ingestion and stay stable for the
//! whole session: the store grows by appending and never reorders or
//! removes individual lines.

use std::ops::Range;

/// Ordered sequence of raw log lines for the current session.
#[derive(Debug, Default)]
pub struct LineStore {
    lines: Vec<String>,
}

impl LineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with an initial batch of lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Append a batch of lines in stream order.
    ///
    /// Returns the range of absolute indices the batch now occupies.
    pub fn append<I>(&mut self, lines: I) -> Range<usize>
    where
        I: IntoIterator<Item = String>,
    {
        let start = self.lines.len();
        self.lines.extend(lines);
        start..self.lines.len()
    }

    /// Get the raw text of a line by absolute index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop all lines. Only used for whole-session resets; indices restart
    /// from zero afterwards.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_assigns_monotonic_indices() {
        let mut store = LineStore::new();
        let first = store.append(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(first, 0..2);

        let second = store.append(vec!["c".to_string()]);
        assert_eq!(second, 2..3);

        assert_eq!(store.get(0), Some("a"));
        assert_eq!(store.get(2), Some("c"));
        assert_eq!(store.get(3), None);
    }

    #[test]
    fn test_append_empty_batch() {
        let mut store = LineStore::from_lines(vec!["a".to_string()]);
        let range = store.append(Vec::new());
        assert_eq!(range, 1..1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_resets_indices() {
        let mut store = LineStore::from_lines(vec!["a".to_string(), "b".to_string()]);
        store.clear();
        assert!(store.is_empty());
        let range = store.append(vec!["c".to_string()]);
        assert_eq!(range, 0..1);
    }
}
