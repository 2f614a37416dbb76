//! Search over the processed display sequence.
//!
//! Only visible rows are eligible; collapsed markers are skipped, never
//! matched. Navigation through results wraps circularly at both ends and
//! is pure index arithmetic, no re-search.

use crate::display::ProcessedLine;
use crate::error::EngineError;
use crate::filter::matcher::Matcher;

/// Direction for stepping through search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Optional inclusive line-number bounds on search eligibility.
/// Applied conjunctively with row visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchBounds {
    pub lower: Option<usize>,
    pub upper: Option<usize>,
}

impl SearchBounds {
    pub fn contains(&self, line: usize) -> bool {
        if let Some(lower) = self.lower {
            if line < lower {
                return false;
            }
        }
        if let Some(upper) = self.upper {
            if line > upper {
                return false;
            }
        }
        true
    }
}

/// Run a compiled matcher over the visible rows, honoring bounds.
///
/// Results are ascending absolute line numbers with no duplicates
/// (display rows are already unique and ordered).
pub fn search<'a, F>(
    matcher: &Matcher,
    processed: &[ProcessedLine],
    bounds: SearchBounds,
    line_accessor: F,
) -> Vec<usize>
where
    F: Fn(usize) -> Option<&'a str>,
{
    let mut results = Vec::new();
    for row in processed {
        let Some(line) = row.line_number() else {
            continue;
        };
        if !bounds.contains(line) {
            continue;
        }
        let Some(text) = line_accessor(line) else {
            continue;
        };
        if matcher.matches(text) && results.last() != Some(&line) {
            results.push(line);
        }
    }
    results
}

/// Search pattern, results, and the active match position.
///
/// Results are replaced wholesale on every recompute; the current index is
/// reset to the first match (or cleared) whenever they change.
#[derive(Debug, Default)]
pub struct SearchState {
    pattern: Option<String>,
    matcher: Option<Matcher>,
    case_sensitive: bool,
    bounds: SearchBounds,
    results: Vec<usize>,
    current: Option<usize>,
}

impl SearchState {
    /// Set the search pattern, compiling it with the given sensitivity.
    ///
    /// An empty pattern clears the search. An invalid pattern clears
    /// results and returns `InvalidSearchPattern`.
    pub fn set_pattern(&mut self, pattern: &str, case_sensitive: bool) -> Result<(), EngineError> {
        self.case_sensitive = case_sensitive;
        if pattern.is_empty() {
            self.clear();
            return Ok(());
        }

        match Matcher::compile(pattern, case_sensitive) {
            Ok(matcher) => {
                self.pattern = Some(pattern.to_string());
                self.matcher = Some(matcher);
                Ok(())
            }
            Err(e) => {
                self.clear();
                Err(EngineError::InvalidSearchPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })
            }
        }
    }

    /// Toggle case sensitivity, recompiling the current pattern.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
        // A pattern that compiled before stays valid; only the case flag
        // changes, so the rebuild cannot fail.
        if let Some(pattern) = &self.pattern {
            self.matcher = Matcher::compile(pattern, case_sensitive).ok();
        }
    }

    pub fn set_bounds(&mut self, bounds: SearchBounds) {
        self.bounds = bounds;
    }

    /// Drop the pattern and all derived results.
    pub fn clear(&mut self) {
        self.pattern = None;
        self.matcher = None;
        self.results.clear();
        self.current = None;
    }

    /// Re-run the search against a fresh display sequence.
    ///
    /// The current index resets to the first match, or clears when there
    /// are no matches.
    pub fn recompute<'a, F>(&mut self, processed: &[ProcessedLine], line_accessor: F)
    where
        F: Fn(usize) -> Option<&'a str>,
    {
        let Some(matcher) = &self.matcher else {
            self.results.clear();
            self.current = None;
            return;
        };
        self.results = search(matcher, processed, self.bounds, line_accessor);
        self.current = if self.results.is_empty() { None } else { Some(0) };
    }

    /// Step to the next or previous match, wrapping at both ends.
    ///
    /// Returns the absolute line number of the new active match.
    pub fn paginate(&mut self, direction: Direction) -> Option<usize> {
        let len = self.results.len();
        if len == 0 {
            return None;
        }
        let current = self.current.unwrap_or(0);
        let next = match direction {
            Direction::Next => (current + 1) % len,
            Direction::Previous => (current + len - 1) % len,
        };
        self.current = Some(next);
        Some(self.results[next])
    }

    /// Whether a pattern is currently set.
    pub fn is_active(&self) -> bool {
        self.matcher.is_some()
    }

    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn results(&self) -> &[usize] {
        &self.results
    }

    pub fn match_count(&self) -> usize {
        self.results.len()
    }

    /// Index of the active match within `results`.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Absolute line number of the active match.
    pub fn current_line(&self) -> Option<usize> {
        self.current.map(|i| self.results[i])
    }

    pub fn bounds(&self) -> SearchBounds {
        self.bounds
    }
}
