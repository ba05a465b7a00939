//! Log entry structure

use super::log_level::LogLevel;
use super::properties::{FieldValue, Properties};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

/// Captured error chain: the top-level error message followed by each `source()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    pub message: String,
    pub causes: Vec<String>,
}

impl ExceptionInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            causes: Vec::new(),
        }
    }

    /// Walk an error and its sources
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        Self {
            message: error.to_string(),
            causes,
        }
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for cause in &self.causes {
            write!(f, "\n  caused by: {}", cause)?;
        }
        Ok(())
    }
}

/// One log occurrence. Built once per log call and never mutated after dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub logger_name: String,
    pub level: LogLevel,
    pub message: String,
    pub exception: Option<ExceptionInfo>,
    pub timestamp: DateTime<Utc>,
    pub properties: Properties,
}

impl LogEntry {
    pub fn new(
        logger_name: impl Into<String>,
        level: LogLevel,
        message: impl Into<String>,
    ) -> Self {
        Self {
            logger_name: logger_name.into(),
            level,
            message: message.into(),
            exception: None,
            timestamp: Utc::now(),
            properties: Properties::new(),
        }
    }

    #[must_use]
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }

    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Override the creation time, e.g. when replaying stored entries
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn has_properties(&self) -> bool {
        !self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "connection refused")
        }
    }

    impl StdError for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "mailbox request failed")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_exception_chain() {
        let info = ExceptionInfo::from_error(&Outer(Inner));
        assert_eq!(info.message, "mailbox request failed");
        assert_eq!(info.causes, vec!["connection refused".to_string()]);
        assert_eq!(
            info.to_string(),
            "mailbox request failed\n  caused by: connection refused"
        );
    }

    #[test]
    fn test_entry_value_equality() {
        let entry = LogEntry::new("Bot", LogLevel::Info, "started").with_property("chat", 7);
        let copy = entry.clone();
        assert_eq!(entry, copy);
        assert!(entry.has_properties());
    }
}
