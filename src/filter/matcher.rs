//! Compiled line matchers shared by the filter and search engines.
//!
//! Literal patterns take a substring fast path; anything containing regex
//! metacharacters compiles to a full regex with containment semantics.
//! Case-insensitive substring matching lowers the needle once at compile
//! time instead of per line.

use memchr::memmem;
use regex::{Regex, RegexBuilder};

/// A compiled matcher for a single pattern.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Literal substring match.
    Substring {
        pattern: String,
        case_sensitive: bool,
    },
    /// Regex match.
    Regex(Regex),
}

impl Matcher {
    /// Compile a pattern, honoring case sensitivity.
    ///
    /// Callers wrap the error into their own `EngineError` variant
    /// (filter vs search).
    pub fn compile(pattern: &str, case_sensitive: bool) -> Result<Self, regex::Error> {
        // No metacharacters means the pattern is a plain substring
        if regex::escape(pattern) == pattern {
            return Ok(Self::Substring {
                pattern: if case_sensitive {
                    pattern.to_string()
                } else {
                    pattern.to_lowercase()
                },
                case_sensitive,
            });
        }

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self::Regex(regex))
    }

    /// Check whether a line contains the pattern.
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::Substring {
                pattern,
                case_sensitive,
            } => {
                if *case_sensitive {
                    memmem::find(line.as_bytes(), pattern.as_bytes()).is_some()
                } else {
                    line.to_lowercase().contains(pattern.as_str())
                }
            }
            Self::Regex(regex) => regex.is_match(line),
        }
    }
}
