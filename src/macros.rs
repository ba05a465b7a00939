//! Logging macros with `format!`-style arguments.
//!
//! The message is only formatted when the level passes the logger's minimum level.
//!
//! # Examples
//!
//! ```
//! use tempmail_logging::prelude::*;
//! use tempmail_logging::info;
//!
//! let logger = Logger::new("Telegram.Core", LoggerConfiguration::new().shared());
//!
//! info!(logger, "Bot started");
//!
//! let chat_id = 42;
//! info!(logger, "Mailbox requested by chat {}", chat_id);
//! ```

/// Log a formatted message at `$level`.
///
/// # Examples
///
/// ```
/// # use tempmail_logging::prelude::*;
/// # let logger = Logger::new("Client.Data", LoggerConfiguration::new().shared());
/// use tempmail_logging::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Mail API returned {}", 502);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, format!($($arg)+));
        } else {
            logger.metrics().record_below_threshold();
        }
    }};
}

/// Log a message template; every argument is converted into a
/// [`FieldValue`](crate::core::FieldValue).
///
/// ```
/// # use std::sync::Arc;
/// # use tempmail_logging::prelude::*;
/// use tempmail_logging::log_template;
///
/// let memory = Arc::new(MemoryHandler::new());
/// let configuration = LoggerConfiguration::new();
/// configuration.add_handler(memory.clone());
/// let logger = Logger::new("Telegram.Core", configuration.shared());
///
/// log_template!(logger, LogLevel::Info, "Chat {ChatId} got {Count} letters", 42, 3);
/// assert_eq!(memory.messages(), ["Chat 42 got 3 letters"]);
/// assert_eq!(memory.entries()[0].properties["ChatId"], FieldValue::Int(42));
/// ```
#[macro_export]
macro_rules! log_template {
    ($logger:expr, $level:expr, $template:expr $(, $arg:expr)* $(,)?) => {
        $logger.log_template($level, $template, &[$($crate::core::FieldValue::from($arg)),*])
    };
}

/// Log a trace-level message.
///
/// ```
/// # use tempmail_logging::prelude::*;
/// # let configuration = LoggerConfiguration::new().with_minimum_level(LogLevel::Trace);
/// # let logger = Logger::new("x", configuration.shared());
/// use tempmail_logging::trace;
/// trace!(logger, "Polling inbox {}", "a1b2@tmp.io");
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use tempmail_logging::prelude::*;
/// # let logger = Logger::new("x", LoggerConfiguration::new().shared());
/// use tempmail_logging::warning;
/// warning!(logger, "Retry {} of {}", 1, 3);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::LogLevel::Critical, $($arg)+)
    };
}
