//! Timestamp formatting utilities
//!
//! Formatters accept timestamp patterns in the `yyyy-MM-dd HH:mm:ss` style used by the
//! bot's configuration files. Those patterns are translated once into chrono strftime
//! items; patterns that already contain `%` are taken as strftime verbatim.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use super::error::{LoggerError, Result};

/// Pattern used when a `{Timestamp}` placeholder carries no explicit format.
pub const DEFAULT_TIMESTAMP_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";

/// Standardized timestamp format options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 with milliseconds and `Z` suffix, used by the JSON formatter
    Rfc3339Millis,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl Default for TimestampFormat {
    fn default() -> Self {
        TimestampFormat::Custom("%Y-%m-%d %H:%M:%S".to_string())
    }
}

impl TimestampFormat {
    /// Build a format from a `yyyy-MM-dd`-style pattern (or a strftime string)
    ///
    /// # Examples
    ///
    /// ```
    /// use tempmail_logging::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::from_pattern("dd/MM/yyyy HH:mm").unwrap();
    /// assert_eq!(format, TimestampFormat::Custom("%d/%m/%Y %H:%M".to_string()));
    /// ```
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let strftime = if pattern.contains('%') {
            pattern.to_string()
        } else {
            translate_pattern(pattern)
        };
        let format = TimestampFormat::Custom(strftime);
        format.validate()?;
        Ok(format)
    }

    /// Reject strftime strings chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(format_str) = self {
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "TimestampFormat",
                    format!("unsupported timestamp pattern '{}'", format_str),
                ));
            }
        }
        Ok(())
    }

    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339Millis => datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                if write!(out, "{}", datetime.format(format_str)).is_err() {
                    return datetime.to_rfc3339_opts(SecondsFormat::Millis, true);
                }
                out
            }
        }
    }
}

/// Translate a `yyyy-MM-dd HH:mm:ss.fff`-style pattern into strftime
fn translate_pattern(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' || c == '"' {
            // quoted literal
            i += 1;
            while i < chars.len() && chars[i] != c {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if c == '\\' {
            if let Some(&next) = chars.get(i + 1) {
                push_literal(&mut out, next);
            }
            i += 2;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let spec = match (c, run) {
            ('y', 1 | 2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('M', 1) => Some("%-m"),
            ('M', 2) => Some("%m"),
            ('M', 3) => Some("%b"),
            ('M', _) => Some("%B"),
            ('d', 1) => Some("%-d"),
            ('d', 2) => Some("%d"),
            ('d', 3) => Some("%a"),
            ('d', _) => Some("%A"),
            ('H', 1) => Some("%-H"),
            ('H', _) => Some("%H"),
            ('h', 1) => Some("%-I"),
            ('h', _) => Some("%I"),
            ('m', 1) => Some("%-M"),
            ('m', _) => Some("%M"),
            ('s', 1) => Some("%-S"),
            ('s', _) => Some("%S"),
            ('f' | 'F', 1..=3) => Some("%3f"),
            ('f' | 'F', 4..=6) => Some("%6f"),
            ('f' | 'F', _) => Some("%9f"),
            ('t', _) => Some("%p"),
            ('z', n) if n >= 3 => Some("%:z"),
            ('z', _) => Some("%z"),
            ('K', _) => Some("%:z"),
            _ => None,
        };

        match spec {
            Some(spec) => {
                out.push_str(spec);
                i += run;
            }
            None => {
                push_literal(&mut out, c);
                i += 1;
            }
        }
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
