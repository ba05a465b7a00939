//! Core logger types and traits

pub mod configuration;
pub mod error;
pub mod factory;
pub mod fallback;
pub mod filter;
pub mod formatter;
pub mod handler;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod message_template;
pub mod metrics;
pub mod properties;
pub mod timestamp;

pub use configuration::LoggerConfiguration;
pub use error::{LoggerError, Result};
pub use factory::{LoggerFactory, LoggerProvider};
pub use fallback::{FallbackCollector, FallbackReport};
pub use filter::Filter;
pub use formatter::Formatter;
pub use handler::Handler;
pub use log_context::{ContextSnapshot, LogContext, LogContextGuard};
pub use log_entry::{ExceptionInfo, LogEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, ScopeGuard, ScopeState, SCOPE_PROPERTY};
pub use metrics::LoggerMetrics;
pub use properties::{format_properties, properties, FieldValue, Properties};
pub use timestamp::{TimestampFormat, DEFAULT_TIMESTAMP_PATTERN};
