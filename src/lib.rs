//! # Temp-mail bot logging engine
//!
//! Named loggers built from a shared [`LoggerConfiguration`], dispatching each entry
//! synchronously to a list of handlers after a list of filters has accepted it.
//!
//! ## Features
//!
//! - **Composable pipeline**: console, daily-rotating file, SQLite and in-memory handlers;
//!   level, time-window and category filters; template, logfmt and JSON formatters
//! - **Failure isolation**: a failing or panicking handler never stops the others and
//!   never reaches the caller
//! - **Scopes and ambient context**: per-logger scopes plus a context stack that follows
//!   threads and tokio tasks
//! - **JSON settings**: build a configuration from the host's `Logging` section
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tempmail_logging::prelude::*;
//!
//! let memory = Arc::new(MemoryHandler::new());
//! let configuration = LoggerConfiguration::new().with_minimum_level(LogLevel::Debug);
//! configuration.add_handler(memory.clone());
//!
//! let factory = LoggerFactory::new(configuration.shared());
//! let logger = factory.create_logger("Telegram.Core");
//! logger.info_template("Mailbox {Address} created", &["a1b2@tmp.io".into()]);
//!
//! assert_eq!(memory.messages(), ["Mailbox a1b2@tmp.io created"]);
//! ```

pub mod core;
pub mod filters;
pub mod formatters;
pub mod handlers;
pub mod macros;
pub mod settings;

pub mod prelude {
    pub use crate::core::{
        properties, ExceptionInfo, FieldValue, Filter, Formatter, Handler, LogContext, LogEntry,
        LogLevel, Logger, LoggerConfiguration, LoggerError, LoggerFactory, LoggerProvider,
        Properties, Result, ScopeState,
    };
    pub use crate::filters::{CategoryFilter, LevelFilter, TimeFilter};
    pub use crate::formatters::{JsonFormatter, StructuredFormatter, TemplateFormatter};
    #[cfg(feature = "database")]
    pub use crate::handlers::DatabaseHandler;
    #[cfg(feature = "file")]
    pub use crate::handlers::FileHandler;
    pub use crate::handlers::{ConsoleHandler, MemoryHandler};
    pub use crate::settings::LoggingSettings;
}

pub use core::{
    ExceptionInfo, FieldValue, LogContext, LogEntry, LogLevel, Logger, LoggerConfiguration,
    LoggerError, LoggerFactory, LoggerMetrics, LoggerProvider, Properties, Result, ScopeGuard,
    ScopeState,
};
pub use settings::{ComponentRegistry, LoggingSettings};
