//! Filter trait gating which entries reach the handlers

use super::log_entry::LogEntry;

/// Pure predicate over a log entry
pub trait Filter: Send + Sync {
    fn is_enabled(&self, entry: &LogEntry) -> bool;

    fn name(&self) -> &str;
}
