pub mod engine;
pub mod matcher;

use serde::{Deserialize, Serialize};

/// How a filter's pattern selects lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Select lines containing the pattern.
    Exact,
    /// Select lines NOT containing the pattern.
    Inverse,
}

/// How multiple visible filters combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterLogic {
    /// A line must satisfy every visible filter.
    #[default]
    And,
    /// A line must satisfy at least one visible filter.
    Or,
}

/// A single filter rule as configured by the caller.
///
/// Serde derives let the persistence collaborator encode rules without the
/// core knowing where they are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub pattern: String,
    pub case_sensitive: bool,
    pub match_type: MatchType,
    /// Disabled rules stay configured but are excluded from evaluation.
    pub visible: bool,
}

impl Filter {
    /// Case-insensitive exact-match filter, the common default.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            case_sensitive: false,
            match_type: MatchType::Exact,
            visible: true,
        }
    }

    pub fn inverse(pattern: impl Into<String>) -> Self {
        Self {
            match_type: MatchType::Inverse,
            ..Self::new(pattern)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_serde_roundtrip() {
        let filter = Filter {
            pattern: "panic".to_string(),
            case_sensitive: true,
            match_type: MatchType::Inverse,
            visible: false,
        };

        let json = serde_json::to_string(&filter).unwrap();
        assert!(json.contains("\"inverse\""));

        let loaded: Filter = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, filter);
    }

    #[test]
    fn test_filter_logic_default_is_and() {
        assert_eq!(FilterLogic::default(), FilterLogic::And);
    }
}
