//! Events raised to collaborators.
//!
//! Transition methods return these instead of dispatching to subscribers,
//! so URL-state sync and scroll-position sync can react without the core
//! depending on their existence.

/// A derived-state change produced by a session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The display sequence was rebuilt.
    DisplayChanged { rows: usize },
    /// Search results were recomputed or the active match moved.
    SearchChanged {
        matches: usize,
        active_index: Option<usize>,
    },
    /// The materialized page moved.
    PageChanged { starting_index: usize },
}
