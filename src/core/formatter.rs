//! Formatter trait for rendering log entries

use super::{error::Result, log_entry::LogEntry};

/// Renders an entry into text
pub trait Formatter: Send + Sync {
    /// Render with the formatter's default template
    fn format(&self, entry: &LogEntry) -> Result<String>;

    /// Render with an explicit template (`{Timestamp[:pattern]}`, `{Level}`,
    /// `{LoggerName}`, `{Message}`, `{<property>}`)
    fn format_with_template(&self, entry: &LogEntry, template: &str) -> Result<String>;

    fn name(&self) -> &str;
}
