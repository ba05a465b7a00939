//! JSON formatter
//!
//! Every entry becomes one object with a fixed schema:
//!
//! ```json
//! {"timestamp":"2025-01-08T10:30:45.123Z","level":"ERROR","loggerName":"Telegram.Core",
//!  "message":"Send failed","exception":null,"properties":{"ChatId":42}}
//! ```

use serde::{Deserialize, Serialize};

use crate::core::{Formatter, LogEntry, LogLevel, LoggerError, Properties, Result, TimestampFormat};

/// Serialized shape of one entry; also used to read the output back
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRecord {
    pub timestamp: String,
    pub level: LogLevel,
    pub logger_name: String,
    pub message: String,
    pub exception: Option<String>,
    pub properties: Properties,
}

impl JsonRecord {
    pub fn from_entry(entry: &LogEntry) -> Self {
        Self {
            timestamp: TimestampFormat::Rfc3339Millis.format(&entry.timestamp),
            level: entry.level,
            logger_name: entry.logger_name.clone(),
            message: entry.message.clone(),
            exception: entry.exception.as_ref().map(ToString::to_string),
            properties: entry.properties.clone(),
        }
    }

    /// Parse one line of formatter output
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Multi-line indented output
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> Result<String> {
        let record = JsonRecord::from_entry(entry);
        let output = if self.pretty {
            serde_json::to_string_pretty(&record)
        } else {
            serde_json::to_string(&record)
        };
        output.map_err(|e| LoggerError::formatter("json", e.to_string()))
    }

    /// The schema is fixed; `template` is ignored.
    fn format_with_template(&self, entry: &LogEntry, _template: &str) -> Result<String> {
        self.format(entry)
    }

    fn name(&self) -> &str {
        "json"
    }
}
