//! Plain-text formatter driven by a placeholder template

use super::{resolve_field, substitute};
use crate::core::{format_properties, Formatter, LogEntry, Result};

/// Template used when none is configured
pub const DEFAULT_TEMPLATE: &str =
    "{Timestamp:yyyy-MM-dd HH:mm:ss} [{Level}] {LoggerName}: {Message}";

/// Renders `{Timestamp[:pattern]}`, `{Level}`, `{LoggerName}`, `{Message}`, `{Exception}`
/// and `{<property>}` holes.
///
/// The exception (if any) follows on a new line, then ` | key=value ...` for the
/// entry's properties.
///
/// # Example
///
/// ```
/// use tempmail_logging::core::{Formatter, LogEntry, LogLevel};
/// use tempmail_logging::formatters::TemplateFormatter;
///
/// let entry = LogEntry::new("Telegram.Core", LogLevel::Warning, "quota low")
///     .with_property("ChatId", 42);
/// let line = TemplateFormatter::new()
///     .format_with_template(&entry, "[{Level}] {Message}")
///     .unwrap();
/// assert_eq!(line, "[WARNING] quota low | ChatId=42");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateFormatter {
    template: String,
}

impl TemplateFormatter {
    pub fn new() -> Self {
        Self::with_template(DEFAULT_TEMPLATE)
    }

    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for TemplateFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for TemplateFormatter {
    fn format(&self, entry: &LogEntry) -> Result<String> {
        self.format_with_template(entry, &self.template)
    }

    fn format_with_template(&self, entry: &LogEntry, template: &str) -> Result<String> {
        let mut output =
            substitute(template, |name, format| resolve_field("template", entry, name, format))?;

        if let Some(ref exception) = entry.exception {
            output.push('\n');
            output.push_str(&exception.to_string());
        }
        if entry.has_properties() {
            output.push_str(" | ");
            output.push_str(&format_properties(&entry.properties));
        }
        Ok(output)
    }

    fn name(&self) -> &str {
        "template"
    }
}
