//! Formatter implementations
//!
//! - [`TemplateFormatter`]: `{Timestamp} [{Level}] {LoggerName}: {Message}` style text (default)
//! - [`StructuredFormatter`]: logfmt `key=value` pairs
//! - [`JsonFormatter`]: one JSON object per entry with a fixed camelCase schema

pub mod json;
pub mod structured;
pub mod template;

pub use json::{JsonFormatter, JsonRecord};
pub use structured::{StructuredFormatter, StructuredOptions};
pub use template::{TemplateFormatter, DEFAULT_TEMPLATE};

use crate::core::{LogEntry, LoggerError, Result, TimestampFormat, DEFAULT_TIMESTAMP_PATTERN};

/// Walk `template`, replacing each `{Name[:format]}` hole with `resolve(name, format)`.
///
/// `{{` and `}}` are literal braces. A hole that resolves to `None` is kept as written,
/// as is an unclosed `{`.
pub(crate) fn substitute<F>(template: &str, mut resolve: F) -> Result<String>
where
    F: FnMut(&str, Option<&str>) -> Result<Option<String>>,
{
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") {
            out.push('{');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with("}}") {
            out.push('}');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        let Some(end) = tail.find('}') else {
            out.push_str(tail);
            return Ok(out);
        };
        let hole = &tail[1..end];
        let (name, format) = match hole.split_once(':') {
            Some((name, format)) => (name.trim(), Some(format)),
            None => (hole.trim(), None),
        };

        match resolve(name, format)? {
            Some(value) => out.push_str(&value),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Value of a standard placeholder, or of a property with that name
pub(crate) fn resolve_field(
    formatter: &str,
    entry: &LogEntry,
    name: &str,
    format: Option<&str>,
) -> Result<Option<String>> {
    let value = match name {
        "Timestamp" => {
            let pattern = format.unwrap_or(DEFAULT_TIMESTAMP_PATTERN);
            Some(format_timestamp(formatter, entry, pattern)?)
        }
        "Level" => Some(entry.level.to_string()),
        "LoggerName" => Some(entry.logger_name.clone()),
        "Message" => Some(entry.message.clone()),
        "Exception" => Some(entry.exception.as_ref().map(ToString::to_string).unwrap_or_default()),
        property => entry.properties.get(property).map(ToString::to_string),
    };
    Ok(value)
}

pub(crate) fn format_timestamp(formatter: &str, entry: &LogEntry, pattern: &str) -> Result<String> {
    let timestamp_format = TimestampFormat::from_pattern(pattern)
        .map_err(|e| LoggerError::formatter(formatter, e.to_string()))?;
    Ok(timestamp_format.format(&entry.timestamp))
}
