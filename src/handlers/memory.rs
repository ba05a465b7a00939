//! In-memory handler for tests

use parking_lot::Mutex;
use std::sync::Arc;

use super::Rendering;
use crate::core::{Formatter, Handler, LogEntry, Result};

/// Records every entry it receives, along with the rendered line.
///
/// Formatting failures are returned to the logger like any other handler error.
#[derive(Debug)]
pub struct MemoryHandler {
    name: String,
    rendering: Rendering,
    records: Mutex<Vec<(LogEntry, String)>>,
}

impl MemoryHandler {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rendering: Rendering::default(),
            records: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        let template = self.rendering.template().map(str::to_string);
        self.rendering = Rendering::new(formatter).with_template(template);
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.rendering = self.rendering.with_template(Some(template.into()));
        self
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.records.lock().iter().map(|(entry, _)| entry.clone()).collect()
    }

    /// Rendered output, one item per entry
    pub fn lines(&self) -> Vec<String> {
        self.records.lock().iter().map(|(_, line)| line.clone()).collect()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records.lock().iter().map(|(entry, _)| entry.message.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Default for MemoryHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for MemoryHandler {
    fn handle(&self, entry: &LogEntry) -> Result<()> {
        let line = self.rendering.render(entry)?;
        self.records.lock().push((entry.clone(), line));
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
