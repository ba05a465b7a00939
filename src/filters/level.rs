//! Severity threshold filter

use crate::core::{Filter, LogEntry, LogLevel};

/// Passes entries at or above `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter {
    threshold: LogLevel,
}

impl LevelFilter {
    pub fn new(threshold: LogLevel) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }
}

impl Filter for LevelFilter {
    fn is_enabled(&self, entry: &LogEntry) -> bool {
        entry.level >= self.threshold
    }

    fn name(&self) -> &str {
        "level"
    }
}
