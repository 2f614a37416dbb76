//! Error types for the log engine.
//!
//! Recoverable errors (bad patterns, rejected jumps) are returned as values
//! and never abort a recompute. The only fatal kind is `Configuration`,
//! raised at window construction before the window can be used.

use std::fmt;

/// Error produced by the log engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A filter pattern failed to compile. The filter is skipped and
    /// evaluation continues with the remaining filters.
    InvalidFilterPattern { pattern: String, message: String },

    /// A search pattern failed to compile. The search yields zero results;
    /// filter state is untouched.
    InvalidSearchPattern { pattern: String, message: String },

    /// Window constructed with a scroll offset that is not strictly less
    /// than the page threshold. Page-boundary detection would oscillate.
    Configuration { offset: usize, threshold: usize },

    /// A jump target outside the display sequence. The jump is rejected
    /// rather than clamped so caller bugs stay visible.
    IndexOutOfBounds { index: usize, total_rows: usize },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidFilterPattern { pattern, message } => {
                write!(f, "invalid filter pattern `{}`: {}", pattern, message)
            }
            EngineError::InvalidSearchPattern { pattern, message } => {
                write!(f, "invalid search pattern `{}`: {}", pattern, message)
            }
            EngineError::Configuration { offset, threshold } => {
                write!(
                    f,
                    "pagination offset ({}) must be less than the page threshold ({})",
                    offset, threshold
                )
            }
            EngineError::IndexOutOfBounds { index, total_rows } => {
                write!(
                    f,
                    "row {} is outside the display sequence (0..{})",
                    index, total_rows
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = EngineError::Configuration {
            offset: 10000,
            threshold: 10000,
        };
        assert_eq!(
            err.to_string(),
            "pagination offset (10000) must be less than the page threshold (10000)"
        );

        let err = EngineError::IndexOutOfBounds {
            index: 99,
            total_rows: 50,
        };
        assert_eq!(
            err.to_string(),
            "row 99 is outside the display sequence (0..50)"
        );
    }
}
