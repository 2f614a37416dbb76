//! Session controller: owns the raw lines, configuration, and derived
//! state, and is the only place any of it mutates.
//!
//! Every mutation goes through a transition method that recomputes the
//! affected derived caches as a full replacement (never an in-place edit)
//! and returns the events collaborators should see. Reads between
//! transitions always observe a complete, consistent snapshot.

use std::collections::HashSet;

use tracing::debug;

use crate::display::{build_display_lines, display_index_of, ExpandedRanges, ProcessedLine};
use crate::error::EngineError;
use crate::event::EngineEvent;
use crate::filter::engine::{evaluate, MatchingLines};
use crate::filter::{Filter, FilterLogic};
use crate::lines::LineStore;
use crate::search::{Direction, SearchBounds, SearchState};
use crate::window::PaginatedWindow;

/// The log processing engine for one viewing session.
pub struct LogSession {
    lines: LineStore,

    // Configuration supplied by collaborators
    filters: Vec<Filter>,
    filter_logic: FilterLogic,
    bookmarks: HashSet<usize>,
    share_line: Option<usize>,
    expanded: ExpandedRanges,
    expandable_rows: bool,
    case_sensitive: bool,

    // Derived caches, replaced wholesale on recompute
    matching: MatchingLines,
    filter_warnings: Vec<EngineError>,
    processed: Vec<ProcessedLine>,
    search: SearchState,
    window: PaginatedWindow,
}

impl Default for LogSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSession {
    pub fn new() -> Self {
        Self {
            lines: LineStore::new(),
            filters: Vec::new(),
            filter_logic: FilterLogic::default(),
            bookmarks: HashSet::new(),
            share_line: None,
            expanded: ExpandedRanges::new(),
            expandable_rows: true,
            case_sensitive: false,
            matching: None,
            filter_warnings: Vec::new(),
            processed: Vec::new(),
            search: SearchState::default(),
            window: PaginatedWindow::with_defaults(0),
        }
    }

    /// Session with a custom window geometry. Fails fast with
    /// `Configuration` when the offset is not below the threshold.
    pub fn with_window(threshold: usize, offset: usize) -> Result<Self, EngineError> {
        let window = PaginatedWindow::new(0, threshold, offset)?;
        Ok(Self {
            window,
            ..Self::new()
        })
    }

    // --- Ingestion ---

    /// Append raw lines in stream order and rebuild derived state.
    pub fn append_lines(&mut self, lines: Vec<String>) -> Vec<EngineEvent> {
        if lines.is_empty() {
            return Vec::new();
        }
        let range = self.lines.append(lines);
        debug!(appended = range.len(), total = self.lines.len(), "ingested lines");
        self.recompute_from_filters()
    }

    /// Reset the store and every derived cache for session reuse.
    /// Filter and bookmark configuration is kept.
    pub fn clear_logs(&mut self) -> Vec<EngineEvent> {
        self.lines.clear();
        self.expanded.clear();
        self.recompute_from_filters()
    }

    // --- Filter configuration ---

    pub fn set_filters(&mut self, filters: Vec<Filter>) -> Vec<EngineEvent> {
        self.filters = filters;
        self.recompute_from_filters()
    }

    pub fn set_filter_logic(&mut self, logic: FilterLogic) -> Vec<EngineEvent> {
        self.filter_logic = logic;
        self.recompute_from_filters()
    }

    // --- Bookmarks, share line, expansion ---

    pub fn set_bookmarks(&mut self, bookmarks: HashSet<usize>) -> Vec<EngineEvent> {
        self.bookmarks = bookmarks;
        self.recompute_display()
    }

    /// Set the shared permalink line. It is forced visible and becomes the
    /// scroll target.
    pub fn set_share_line(&mut self, share_line: Option<usize>) -> Vec<EngineEvent> {
        self.share_line = share_line;
        let mut events = self.recompute_display();
        if let Some(line) = self.share_line {
            self.scroll_to_matching_line(line, &mut events);
        }
        events
    }

    /// Reveal the given inclusive ranges. Idempotent for ranges already
    /// expanded.
    pub fn expand_lines(&mut self, ranges: &[(usize, usize)]) -> Vec<EngineEvent> {
        for &(start, end) in ranges {
            self.expanded.insert(start, end);
        }
        self.recompute_display()
    }

    /// Re-collapse the expanded range at `range_index`.
    pub fn collapse_lines(&mut self, range_index: usize) -> Vec<EngineEvent> {
        if self.expanded.remove(range_index).is_none() {
            return Vec::new();
        }
        self.recompute_display()
    }

    pub fn clear_expanded_lines(&mut self) -> Vec<EngineEvent> {
        if self.expanded.is_empty() {
            return Vec::new();
        }
        self.expanded.clear();
        self.recompute_display()
    }

    pub fn set_expandable_rows(&mut self, expandable_rows: bool) -> Vec<EngineEvent> {
        self.expandable_rows = expandable_rows;
        self.recompute_display()
    }

    // --- Search ---

    /// Set the search pattern. An invalid pattern yields zero results and
    /// surfaces the parse error; filter state is untouched either way.
    pub fn set_search(&mut self, pattern: &str) -> Result<Vec<EngineEvent>, EngineError> {
        self.search.set_pattern(pattern, self.case_sensitive)?;
        let mut events = Vec::new();
        self.refresh_search(&mut events);
        Ok(events)
    }

    pub fn clear_search(&mut self) -> Vec<EngineEvent> {
        self.search.clear();
        vec![EngineEvent::SearchChanged {
            matches: 0,
            active_index: None,
        }]
    }

    /// Restrict search eligibility to `[lower, upper]` line numbers.
    pub fn set_search_bounds(
        &mut self,
        lower: Option<usize>,
        upper: Option<usize>,
    ) -> Vec<EngineEvent> {
        self.search.set_bounds(SearchBounds { lower, upper });
        let mut events = Vec::new();
        self.refresh_search(&mut events);
        events
    }

    /// Global case-sensitivity preference; recompiles the current search
    /// pattern.
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) -> Vec<EngineEvent> {
        self.case_sensitive = case_sensitive;
        self.search.set_case_sensitive(case_sensitive);
        let mut events = Vec::new();
        self.refresh_search(&mut events);
        events
    }

    /// Step the active match forward or backward, wrapping at both ends,
    /// and scroll the window to it.
    pub fn paginate_search(&mut self, direction: Direction) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if let Some(line) = self.search.paginate(direction) {
            events.push(EngineEvent::SearchChanged {
                matches: self.search.match_count(),
                active_index: self.search.current_index(),
            });
            self.scroll_to_matching_line(line, &mut events);
        }
        events
    }

    // --- Window ---

    /// Jump the window to the display row `row`. Out-of-range rows are
    /// rejected, not clamped.
    pub fn scroll_to_line(&mut self, row: usize) -> Result<Vec<EngineEvent>, EngineError> {
        let before = self.window.starting_index();
        self.window.scroll_to_line(row)?;
        let mut events = Vec::new();
        if self.window.starting_index() != before {
            events.push(EngineEvent::PageChanged {
                starting_index: self.window.starting_index(),
            });
        }
        Ok(events)
    }

    pub fn scroll_to_next_page(&mut self) -> Vec<EngineEvent> {
        if self.window.scroll_to_next_page() {
            vec![EngineEvent::PageChanged {
                starting_index: self.window.starting_index(),
            }]
        } else {
            Vec::new()
        }
    }

    pub fn scroll_to_prev_page(&mut self) -> Vec<EngineEvent> {
        if self.window.scroll_to_prev_page() {
            vec![EngineEvent::PageChanged {
                starting_index: self.window.starting_index(),
            }]
        } else {
            Vec::new()
        }
    }

    // --- Read accessors ---

    /// Raw text of a line by absolute index.
    pub fn line(&self, line_number: usize) -> Option<&str> {
        self.lines.get(line_number)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn has_logs(&self) -> bool {
        !self.processed.is_empty()
    }

    /// The full display sequence. The renderer should address it through
    /// the window.
    pub fn processed_lines(&self) -> &[ProcessedLine] {
        &self.processed
    }

    /// Display row by absolute display index.
    pub fn row(&self, display_index: usize) -> Option<&ProcessedLine> {
        self.processed.get(display_index)
    }

    /// The slice of rows the renderer is currently permitted to address.
    pub fn visible_rows(&self) -> &[ProcessedLine] {
        let start = self.window.starting_index();
        &self.processed[start..start + self.window.page_size()]
    }

    pub fn matching_lines(&self) -> Option<&HashSet<usize>> {
        self.matching.as_ref()
    }

    /// Warnings from the most recent filter evaluation (one per filter
    /// whose pattern failed to compile).
    pub fn filter_warnings(&self) -> &[EngineError] {
        &self.filter_warnings
    }

    pub fn search_results(&self) -> &[usize] {
        self.search.results()
    }

    pub fn search_index(&self) -> Option<usize> {
        self.search.current_index()
    }

    /// Absolute line number of the active search match.
    pub fn search_line(&self) -> Option<usize> {
        self.search.current_line()
    }

    pub fn window(&self) -> &PaginatedWindow {
        &self.window
    }

    pub fn expanded_lines(&self) -> &ExpandedRanges {
        &self.expanded
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn filter_logic(&self) -> FilterLogic {
        self.filter_logic
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    // --- Recompute pipeline ---

    /// Filters changed or lines arrived: rebuild matching lines, then
    /// everything downstream.
    fn recompute_from_filters(&mut self) -> Vec<EngineEvent> {
        let outcome = evaluate(&self.lines, &self.filters, self.filter_logic);
        self.matching = outcome.matching;
        self.filter_warnings = outcome.warnings;
        self.recompute_display()
    }

    /// Display inputs changed: rebuild the display sequence, re-clamp the
    /// window, and re-run any active search against the new rows.
    fn recompute_display(&mut self) -> Vec<EngineEvent> {
        self.processed = build_display_lines(
            self.lines.len(),
            self.matching.as_ref(),
            &self.bookmarks,
            self.share_line,
            &self.expanded,
            self.expandable_rows,
        );

        let mut events = Vec::new();
        let before = self.window.starting_index();
        self.window.set_total_rows(self.processed.len());
        events.push(EngineEvent::DisplayChanged {
            rows: self.processed.len(),
        });
        if self.window.starting_index() != before {
            events.push(EngineEvent::PageChanged {
                starting_index: self.window.starting_index(),
            });
        }
        debug!(
            lines = self.lines.len(),
            rows = self.processed.len(),
            "rebuilt display sequence"
        );

        self.refresh_search(&mut events);
        events
    }

    /// Re-run the active search over the current display sequence. The
    /// first match becomes the scroll target; no active pattern means no
    /// search events.
    fn refresh_search(&mut self, events: &mut Vec<EngineEvent>) {
        if !self.search.is_active() {
            return;
        }

        let LogSession {
            search,
            processed,
            lines,
            ..
        } = self;
        search.recompute(processed, |n| lines.get(n));

        events.push(EngineEvent::SearchChanged {
            matches: self.search.match_count(),
            active_index: self.search.current_index(),
        });
        if let Some(line) = self.search.current_line() {
            self.scroll_to_matching_line(line, events);
        }
    }

    /// Scroll the window to the display row holding an absolute line.
    fn scroll_to_matching_line(&mut self, line: usize, events: &mut Vec<EngineEvent>) {
        let Some(row) = display_index_of(&self.processed, line) else {
            return;
        };
        let before = self.window.starting_index();
        // Row index comes from the display sequence, so the jump is in
        // bounds by construction.
        if self.window.scroll_to_line(row).is_ok() && self.window.starting_index() != before {
            events.push(EngineEvent::PageChanged {
                starting_index: self.window.starting_index(),
            });
        }
    }
}
