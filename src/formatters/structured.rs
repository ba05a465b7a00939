//! Logfmt (`key=value`) formatter
//!
//! Example, wrapped here to fit:
//!
//! ```text
//! timestamp="2025-01-08 10:30:45" level=INFO logger=Telegram.Core
//!     message="Mailbox created" ChatId=42
//! ```

use serde::{Deserialize, Serialize};

use super::{format_timestamp, resolve_field, substitute};
use crate::core::{FieldValue, Formatter, LogEntry, Result, DEFAULT_TIMESTAMP_PATTERN};

/// Which fields the structured formatter emits and under which keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase", deny_unknown_fields)]
pub struct StructuredOptions {
    pub include_timestamp: bool,
    pub include_level: bool,
    pub include_logger_name: bool,
    pub include_message: bool,
    pub include_exception: bool,
    pub include_properties: bool,
    pub timestamp_pattern: String,
    pub timestamp_key: String,
    pub level_key: String,
    pub logger_key: String,
    pub message_key: String,
    pub exception_key: String,
}

impl Default for StructuredOptions {
    fn default() -> Self {
        Self {
            include_timestamp: true,
            include_level: true,
            include_logger_name: true,
            include_message: true,
            include_exception: true,
            include_properties: true,
            timestamp_pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
            timestamp_key: "timestamp".to_string(),
            level_key: "level".to_string(),
            logger_key: "logger".to_string(),
            message_key: "message".to_string(),
            exception_key: "exception".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StructuredFormatter {
    options: StructuredOptions,
}

impl StructuredFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: StructuredOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StructuredOptions {
        &self.options
    }

    fn push_exception(&self, parts: &mut Vec<String>, entry: &LogEntry) {
        if !self.options.include_exception {
            return;
        }
        if let Some(ref exception) = entry.exception {
            parts.push(format!(
                "{}={}",
                escape_key(&self.options.exception_key),
                quote_value(&exception.to_string())
            ));
        }
    }

    fn push_properties(&self, parts: &mut Vec<String>, entry: &LogEntry) {
        if !self.options.include_properties {
            return;
        }
        for (key, value) in &entry.properties {
            let formatted_value = match value {
                FieldValue::String(s) => escape_value(s),
                FieldValue::Int(i) => i.to_string(),
                FieldValue::Float(f) => f.to_string(),
                FieldValue::Bool(b) => b.to_string(),
                FieldValue::Null => "null".to_string(),
            };
            parts.push(format!("{}={}", escape_key(key), formatted_value));
        }
    }
}

impl Formatter for StructuredFormatter {
    fn format(&self, entry: &LogEntry) -> Result<String> {
        let options = &self.options;
        let mut parts = Vec::new();

        if options.include_timestamp {
            let timestamp = format_timestamp("structured", entry, &options.timestamp_pattern)?;
            let key = escape_key(&options.timestamp_key);
            parts.push(format!("{}={}", key, escape_value(&timestamp)));
        }
        if options.include_level {
            parts.push(format!("{}={}", escape_key(&options.level_key), entry.level.to_str()));
        }
        if options.include_logger_name {
            let key = escape_key(&options.logger_key);
            parts.push(format!("{}={}", key, escape_value(&entry.logger_name)));
        }
        if options.include_message {
            // always quoted
            let key = escape_key(&options.message_key);
            parts.push(format!("{}={}", key, quote_value(&entry.message)));
        }
        self.push_exception(&mut parts, entry);
        self.push_properties(&mut parts, entry);

        Ok(parts.join(" "))
    }

    /// Render `template` with every substituted value logfmt-escaped, then append
    /// the exception (unless the template already placed it) and the properties as pairs.
    fn format_with_template(&self, entry: &LogEntry, template: &str) -> Result<String> {
        let mut exception_placed = false;
        let head = substitute(template, |name, format| {
            exception_placed |= name == "Exception";
            let value = resolve_field("structured", entry, name, format)?;
            Ok(value.map(|value| escape_value(&value)))
        })?;

        let mut parts = vec![head];
        if !exception_placed {
            self.push_exception(&mut parts, entry);
        }
        self.push_properties(&mut parts, entry);
        parts.retain(|part| !part.is_empty());
        Ok(parts.join(" "))
    }

    fn name(&self) -> &str {
        "structured"
    }
}

/// Keep only characters that are safe in a logfmt key
fn escape_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Quote a value if it contains spaces, quotes, `=` or line breaks
fn escape_value(value: &str) -> String {
    if value.is_empty() || value.contains([' ', '"', '=', '\n', '\r']) {
        quote_value(value)
    } else {
        value.to_string()
    }
}

fn quote_value(value: &str) -> String {
    format!(
        "\"{}\"",
        value
            .replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
            .replace('\r', "\\r")
    )
}
