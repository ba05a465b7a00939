//! Console handler implementation

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::Arc;

use super::Rendering;
use crate::core::{fallback, Formatter, Handler, LogEntry, Result, TimestampFormat};

#[cfg(feature = "console")]
use colored::Colorize;

/// Standard stream a console handler writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    Stderr,
}

pub struct ConsoleHandler {
    rendering: Rendering,
    use_colors: bool,
    /// Serializes writes so concurrent lines never interleave
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleHandler {
    pub fn new() -> Self {
        Self::with_target(ConsoleTarget::Stdout)
    }

    pub fn with_target(target: ConsoleTarget) -> Self {
        let writer: Box<dyn Write + Send> = match target {
            ConsoleTarget::Stdout => Box::new(io::stdout()),
            ConsoleTarget::Stderr => Box::new(io::stderr()),
        };
        Self::with_writer(writer).with_colors(true)
    }

    /// Write to an arbitrary sink instead of a standard stream. Colors start disabled.
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            rendering: Rendering::default(),
            use_colors: false,
            writer: Mutex::new(writer),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
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

    pub fn uses_colors(&self) -> bool {
        self.use_colors
    }

    /// `timestamp [LEVEL] logger: message`, used when the formatter fails
    fn raw_line(entry: &LogEntry) -> String {
        let mut line = format!(
            "{} [{}] {}: {}",
            TimestampFormat::default().format(&entry.timestamp),
            entry.level,
            entry.logger_name,
            entry.message
        );
        if let Some(ref exception) = entry.exception {
            line.push('\n');
            line.push_str(&exception.to_string());
        }
        line
    }

    #[cfg(feature = "console")]
    fn colorize(&self, line: String, entry: &LogEntry) -> String {
        if self.use_colors {
            line.color(entry.level.color_code()).to_string()
        } else {
            line
        }
    }

    #[cfg(not(feature = "console"))]
    fn colorize(&self, line: String, _entry: &LogEntry) -> String {
        line
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for ConsoleHandler {
    fn handle(&self, entry: &LogEntry) -> Result<()> {
        let line = match self.rendering.render(entry) {
            Ok(line) => line,
            Err(e) => {
                fallback::report("handler 'console'", format!("formatting failed: {}", e));
                Self::raw_line(entry)
            }
        };
        let line = self.colorize(line, entry);

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
