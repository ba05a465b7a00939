//! Logger-name filter

use regex::Regex;

use crate::core::{Filter, LogEntry, LoggerError, Result};

/// Matches `entry.logger_name` against a regular expression.
///
/// Inclusive filters pass matching names; exclusive filters pass everything else.
#[derive(Debug, Clone)]
pub struct CategoryFilter {
    pattern: Regex,
    inclusive: bool,
}

impl CategoryFilter {
    /// Fails if `pattern` is not a valid regular expression
    pub fn new(pattern: &str, inclusive: bool) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|e| LoggerError::pattern(pattern, e))?;
        Ok(Self { pattern, inclusive })
    }

    pub fn include(pattern: &str) -> Result<Self> {
        Self::new(pattern, true)
    }

    pub fn exclude(pattern: &str) -> Result<Self> {
        Self::new(pattern, false)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }
}

impl Filter for CategoryFilter {
    fn is_enabled(&self, entry: &LogEntry) -> bool {
        self.pattern.is_match(&entry.logger_name) == self.inclusive
    }

    fn name(&self) -> &str {
        "category"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    fn named(name: &str) -> LogEntry {
        LogEntry::new(name, LogLevel::Info, "m")
    }

    #[test]
    fn test_inclusive() {
        let filter = CategoryFilter::include("^Telegram").unwrap();
        assert!(filter.is_enabled(&named("Telegram.Core")));
        assert!(!filter.is_enabled(&named("Client.Data")));
    }

    #[test]
    fn test_exclusive() {
        let filter = CategoryFilter::exclude("^Telegram").unwrap();
        assert!(!filter.is_enabled(&named("Telegram.Core")));
        assert!(filter.is_enabled(&named("Client.Data")));
    }

    #[test]
    fn test_invalid_pattern_fails_fast() {
        let err = CategoryFilter::new("(unclosed", true).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidPattern { .. }));
        assert!(err.to_string().contains("(unclosed"));
    }
}
