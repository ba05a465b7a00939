//! Handler implementations

pub mod console;
#[cfg(feature = "database")]
pub mod database;
#[cfg(feature = "file")]
pub mod file;
pub mod memory;

pub use console::{ConsoleHandler, ConsoleTarget};
#[cfg(feature = "database")]
pub use database::{DatabaseHandler, StoredLog};
#[cfg(feature = "file")]
pub use file::FileHandler;
pub use memory::MemoryHandler;

use std::sync::Arc;

use crate::core::{Formatter, LogEntry, Result};
use crate::formatters::TemplateFormatter;

/// Formatter plus optional template override shared by the text handlers
#[derive(Clone)]
pub struct Rendering {
    formatter: Arc<dyn Formatter>,
    template: Option<String>,
}

impl Rendering {
    pub fn new(formatter: Arc<dyn Formatter>) -> Self {
        Self {
            formatter,
            template: None,
        }
    }

    #[must_use]
    pub fn with_template(mut self, template: Option<String>) -> Self {
        self.template = template;
        self
    }

    pub fn formatter(&self) -> &Arc<dyn Formatter> {
        &self.formatter
    }

    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    pub fn render(&self, entry: &LogEntry) -> Result<String> {
        match self.template {
            Some(ref template) => self.formatter.format_with_template(entry, template),
            None => self.formatter.format(entry),
        }
    }
}

impl Default for Rendering {
    fn default() -> Self {
        Self::new(Arc::new(TemplateFormatter::new()))
    }
}

impl std::fmt::Debug for Rendering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rendering")
            .field("formatter", &self.formatter.name())
            .field("template", &self.template)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use crate::formatters::JsonFormatter;

    #[test]
    fn test_template_override() {
        let entry = LogEntry::new("Client.Data", LogLevel::Info, "ready");
        let rendering = Rendering::default().with_template(Some("{Level}:{Message}".into()));
        assert_eq!(rendering.render(&entry).unwrap(), "INFO:ready");
        assert_eq!(rendering.template(), Some("{Level}:{Message}"));
    }

    #[test]
    fn test_formatter_choice() {
        let entry = LogEntry::new("Client.Data", LogLevel::Info, "ready");
        let rendering = Rendering::new(Arc::new(JsonFormatter::new()));
        assert!(rendering.render(&entry).unwrap().starts_with('{'));
        assert_eq!(rendering.formatter().name(), "json");
    }
}
