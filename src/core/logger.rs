//! Main logger implementation

use super::{
    configuration::LoggerConfiguration,
    fallback,
    filter::Filter,
    handler::Handler,
    log_context::LogContext,
    log_entry::{ExceptionInfo, LogEntry},
    log_level::LogLevel,
    message_template,
    metrics::LoggerMetrics,
    properties::{FieldValue, Properties},
    error::{LoggerError, Result},
};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::error::Error as StdError;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Property key under which active scope labels are exposed
pub const SCOPE_PROPERTY: &str = "Scope";

/// State attached to a logger by [`Logger::begin_scope`]
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeState {
    /// Free-form label; all active labels are joined into the `Scope` property
    Label(String),
    /// Properties flattened into every entry
    Properties(Properties),
}

impl From<&str> for ScopeState {
    fn from(label: &str) -> Self {
        Self::Label(label.to_string())
    }
}

impl From<String> for ScopeState {
    fn from(label: String) -> Self {
        Self::Label(label)
    }
}

impl From<Properties> for ScopeState {
    fn from(properties: Properties) -> Self {
        Self::Properties(properties)
    }
}

type ScopeData = Arc<DashMap<u64, ScopeState>>;

/// Handle returned by [`Logger::begin_scope`]; dropping it removes exactly its own scope.
#[must_use = "the scope ends as soon as the guard is dropped"]
pub struct ScopeGuard {
    scopes: ScopeData,
    key: u64,
}

impl ScopeGuard {
    pub fn key(&self) -> u64 {
        self.key
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        self.scopes.remove(&self.key);
    }
}

impl fmt::Debug for ScopeGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeGuard").field("key", &self.key).finish()
    }
}

pub struct Logger {
    name: String,
    configuration: Arc<LoggerConfiguration>,
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
    filters: RwLock<Vec<Arc<dyn Filter>>>,
    scopes: ScopeData,
    next_scope_key: AtomicU64,
    /// Metrics for observability (filtered, dispatched, handler failures)
    metrics: LoggerMetrics,
}

impl Logger {
    /// Create a logger that copies the handler and filter lists of `configuration`.
    ///
    /// Later changes to those lists are not seen by this logger; the minimum level is
    /// read from `configuration` on every call.
    #[must_use]
    pub fn new(name: impl Into<String>, configuration: Arc<LoggerConfiguration>) -> Self {
        let handlers = configuration.handlers();
        let filters = configuration.filters();
        Self {
            name: name.into(),
            configuration,
            handlers: RwLock::new(handlers),
            filters: RwLock::new(filters),
            scopes: Arc::new(DashMap::new()),
            next_scope_key: AtomicU64::new(1),
            metrics: LoggerMetrics::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn configuration(&self) -> &Arc<LoggerConfiguration> {
        &self.configuration
    }

    /// Whether a call at `level` would pass the minimum level check
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.configuration.minimum_level()
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.check_level(level) {
            return;
        }
        let entry = self.build_entry(level, message.into(), Properties::new());
        self.dispatch(&entry);
    }

    /// Log with an error; the error and its `source()` chain are captured.
    pub fn log_with_error(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        error: &(dyn StdError + 'static),
    ) {
        if !self.check_level(level) {
            return;
        }
        let entry = self
            .build_entry(level, message.into(), Properties::new())
            .with_exception(ExceptionInfo::from_error(error));
        self.dispatch(&entry);
    }

    /// Log a message template such as `"User {UserId} created {Address}"`.
    ///
    /// Holes are filled from `args` in order; named holes are also attached as
    /// properties of the entry.
    pub fn log_template(&self, level: LogLevel, template: &str, args: &[FieldValue]) {
        if !self.check_level(level) {
            return;
        }
        let rendered = message_template::render(template, args);
        let entry = self.build_entry(level, rendered.message, rendered.properties);
        self.dispatch(&entry);
    }

    /// Templated message plus an error chain
    pub fn log_template_with_error(
        &self,
        level: LogLevel,
        template: &str,
        args: &[FieldValue],
        error: &(dyn StdError + 'static),
    ) {
        if !self.check_level(level) {
            return;
        }
        let rendered = message_template::render(template, args);
        let entry = self
            .build_entry(level, rendered.message, rendered.properties)
            .with_exception(ExceptionInfo::from_error(error));
        self.dispatch(&entry);
    }

    fn check_level(&self, level: LogLevel) -> bool {
        let enabled = self.is_enabled(level);
        if !enabled {
            self.metrics.record_below_threshold();
        }
        enabled
    }

    /// Ambient context first, then scope-data, then call-site properties.
    fn build_entry(&self, level: LogLevel, message: String, extra: Properties) -> LogEntry {
        let mut properties = LogContext::properties();
        properties.extend(self.scope_properties());
        properties.extend(extra);
        LogEntry::new(self.name.as_str(), level, message).with_properties(properties)
    }

    /// Run an already-built entry through the filter chain and every handler.
    ///
    /// The minimum level is not checked here.
    pub fn dispatch(&self, entry: &LogEntry) {
        let filters = self.filters.read().clone();
        if !filters.iter().all(|filter| Self::filter_allows(filter.as_ref(), entry)) {
            self.metrics.record_filtered();
            return;
        }

        self.metrics.record_dispatched();
        let handlers = self.handlers.read().clone();
        Self::process_sync(&handlers, entry, &self.metrics);
    }

    /// A panicking filter rejects the entry
    fn filter_allows(filter: &dyn Filter, entry: &LogEntry) -> bool {
        match catch_unwind(AssertUnwindSafe(|| filter.is_enabled(entry))) {
            Ok(enabled) => enabled,
            Err(panic_info) => {
                fallback::report(
                    format!("filter '{}'", filter.name()),
                    format!("panicked: {}", fallback::panic_message(panic_info.as_ref())),
                );
                false
            }
        }
    }

    /// Hand `entry` to each handler in order with per-handler panic isolation.
    ///
    /// Returns the number of handlers that failed.
    fn process_sync(
        handlers: &[Arc<dyn Handler>],
        entry: &LogEntry,
        metrics: &LoggerMetrics,
    ) -> usize {
        let mut failures = 0;

        for handler in handlers {
            let result = catch_unwind(AssertUnwindSafe(|| handler.handle(entry)));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    fallback::report(format!("handler '{}'", handler.name()), e);
                    failures += 1;
                }
                Err(panic_info) => {
                    fallback::report(
                        format!("handler '{}'", handler.name()),
                        format!(
                            "panicked: {}. Other handlers continue to function.",
                            fallback::panic_message(panic_info.as_ref())
                        ),
                    );
                    failures += 1;
                }
            }
        }

        for _ in 0..failures {
            metrics.record_handler_failure();
        }
        failures
    }

    /// Attach `state` to every entry logged until the returned guard is dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use tempmail_logging::prelude::*;
    ///
    /// let memory = Arc::new(MemoryHandler::new());
    /// let config = LoggerConfiguration::new().shared();
    /// config.add_handler(memory.clone());
    /// let logger = Logger::new("Telegram.Core", config);
    ///
    /// {
    ///     let _scope = logger.begin_scope("command /new");
    ///     logger.info("creating mailbox");
    /// }
    /// logger.info("idle");
    ///
    /// let entries = memory.entries();
    /// assert_eq!(entries[0].properties["Scope"].to_string(), "command /new");
    /// assert!(!entries[1].properties.contains_key("Scope"));
    /// ```
    pub fn begin_scope(&self, state: impl Into<ScopeState>) -> ScopeGuard {
        let key = self.next_scope_key.fetch_add(1, Ordering::Relaxed);
        self.scopes.insert(key, state.into());
        ScopeGuard {
            scopes: Arc::clone(&self.scopes),
            key,
        }
    }

    /// Number of scopes currently held open
    pub fn active_scopes(&self) -> usize {
        self.scopes.len()
    }

    /// Flattened properties of every active scope, in begin order
    fn scope_properties(&self) -> Properties {
        let mut properties = Properties::new();
        if self.scopes.is_empty() {
            return properties;
        }

        let mut active: Vec<(u64, ScopeState)> = self
            .scopes
            .iter()
            .map(|scope| (*scope.key(), scope.value().clone()))
            .collect();
        active.sort_by_key(|(key, _)| *key);

        let mut labels = Vec::new();
        for (_, state) in active {
            match state {
                ScopeState::Label(label) => labels.push(label),
                ScopeState::Properties(scope_properties) => properties.extend(scope_properties),
            }
        }
        if !labels.is_empty() {
            properties.insert(SCOPE_PROPERTY.to_string(), FieldValue::String(labels.join(" => ")));
        }
        properties
    }

    /// Append a handler to this logger only
    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.handlers.write().push(handler);
    }

    /// Append a filter to this logger only
    pub fn add_filter(&self, filter: Arc<dyn Filter>) {
        self.filters.write().push(filter);
    }

    /// Remove the first handler named `name`.
    ///
    /// Dispatches already in flight keep using their own snapshot of the list.
    pub fn remove_handler(&self, name: &str) -> Result<Arc<dyn Handler>> {
        let mut handlers = self.handlers.write();
        let index = handlers
            .iter()
            .position(|h| h.name() == name)
            .ok_or_else(|| LoggerError::not_found("handler", name))?;
        Ok(handlers.remove(index))
    }

    /// Remove the first filter named `name`
    pub fn remove_filter(&self, name: &str) -> Result<Arc<dyn Filter>> {
        let mut filters = self.filters.write();
        let index = filters
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| LoggerError::not_found("filter", name))?;
        Ok(filters.remove(index))
    }

    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.handlers.read().clone()
    }

    pub fn filters(&self) -> Vec<Arc<dyn Filter>> {
        self.filters.read().clone()
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use tempmail_logging::prelude::*;
    ///
    /// let logger = Logger::new("Client.Data", LoggerConfiguration::new().shared());
    /// logger.debug("below the default Info threshold");
    /// logger.info("no handlers, still counted as dispatched");
    ///
    /// assert_eq!(logger.metrics().below_threshold(), 1);
    /// assert_eq!(logger.metrics().dispatched(), 1);
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush every handler; failures go to the fallback sink
    pub fn flush(&self) {
        let handlers = self.handlers.read().clone();
        for handler in &handlers {
            let result = catch_unwind(AssertUnwindSafe(|| handler.flush()));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    let source = format!("handler '{}'", handler.name());
                    fallback::report(source, format!("flush failed: {}", e));
                }
                Err(panic_info) => {
                    let panic = fallback::panic_message(panic_info.as_ref());
                    fallback::report(
                        format!("handler '{}'", handler.name()),
                        format!("panicked during flush: {}", panic),
                    );
                }
            }
        }
    }
}

macro_rules! level_methods {
    ($($level:ident => $plain:ident, $with_error:ident, $template:ident;)*) => {
        impl Logger {
            $(
                #[inline]
                pub fn $plain(&self, message: impl Into<String>) {
                    self.log(LogLevel::$level, message);
                }

                #[inline]
                pub fn $with_error(
                    &self,
                    message: impl Into<String>,
                    error: &(dyn StdError + 'static),
                ) {
                    self.log_with_error(LogLevel::$level, message, error);
                }

                #[inline]
                pub fn $template(&self, template: &str, args: &[FieldValue]) {
                    self.log_template(LogLevel::$level, template, args);
                }
            )*
        }
    };
}

level_methods! {
    Trace => trace, trace_with_error, trace_template;
    Debug => debug, debug_with_error, debug_template;
    Info => info, info_with_error, info_template;
    Warning => warning, warning_with_error, warning_template;
    Error => error, error_with_error, error_template;
    Critical => critical, critical_with_error, critical_template;
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers: Vec<String> =
            self.handlers.read().iter().map(|h| h.name().to_string()).collect();
        let filters: Vec<String> =
            self.filters.read().iter().map(|x| x.name().to_string()).collect();
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("handlers", &handlers)
            .field("filters", &filters)
            .field("active_scopes", &self.scopes.len())
            .finish()
    }
}
