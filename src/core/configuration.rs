//! Shared logger configuration
//!
//! A `LoggerConfiguration` is shared (behind `Arc`) by a factory and every logger it
//! creates. Loggers read the global minimum level live on each call, but copy the
//! handler and filter lists once, when they are constructed.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::error::{LoggerError, Result};
use super::filter::Filter;
use super::handler::Handler;
use super::log_level::LogLevel;

pub struct LoggerConfiguration {
    minimum_level: RwLock<LogLevel>,
    category_levels: RwLock<HashMap<String, LogLevel>>,
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
    filters: RwLock<Vec<Arc<dyn Filter>>>,
}

impl LoggerConfiguration {
    #[must_use]
    pub fn new() -> Self {
        Self {
            minimum_level: RwLock::new(LogLevel::Info),
            category_levels: RwLock::new(HashMap::new()),
            handlers: RwLock::new(Vec::new()),
            filters: RwLock::new(Vec::new()),
        }
    }

    /// Set the global minimum level
    #[must_use = "builder methods return a new value"]
    pub fn with_minimum_level(self, level: LogLevel) -> Self {
        self.set_minimum_level(level);
        self
    }

    /// Append a handler
    #[must_use = "builder methods return a new value"]
    pub fn with_handler<H: Handler + 'static>(self, handler: H) -> Self {
        self.add_handler(Arc::new(handler));
        self
    }

    /// Append a filter
    #[must_use = "builder methods return a new value"]
    pub fn with_filter<F: Filter + 'static>(self, filter: F) -> Self {
        self.add_filter(Arc::new(filter));
        self
    }

    /// Wrap for sharing with a factory
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn minimum_level(&self) -> LogLevel {
        *self.minimum_level.read()
    }

    pub fn set_minimum_level(&self, level: LogLevel) {
        *self.minimum_level.write() = level;
    }

    /// Record a per-category level
    ///
    /// The value is kept and reported by [`category_level`](Self::category_level), but
    /// loggers only consult the global minimum level when deciding whether to dispatch.
    pub fn set_category_level(&self, category: impl Into<String>, level: LogLevel) {
        self.category_levels.write().insert(category.into(), level);
    }

    pub fn category_level(&self, category: &str) -> Option<LogLevel> {
        self.category_levels.read().get(category).copied()
    }

    pub fn category_levels(&self) -> HashMap<String, LogLevel> {
        self.category_levels.read().clone()
    }

    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        self.handlers.write().push(handler);
    }

    /// Remove the first handler registered under `name`
    pub fn remove_handler(&self, name: &str) -> Result<Arc<dyn Handler>> {
        let mut handlers = self.handlers.write();
        let index = handlers
            .iter()
            .position(|h| h.name() == name)
            .ok_or_else(|| LoggerError::not_found("handler", name))?;
        Ok(handlers.remove(index))
    }

    pub fn add_filter(&self, filter: Arc<dyn Filter>) {
        self.filters.write().push(filter);
    }

    /// Remove the first filter registered under `name`
    pub fn remove_filter(&self, name: &str) -> Result<Arc<dyn Filter>> {
        let mut filters = self.filters.write();
        let index = filters
            .iter()
            .position(|f| f.name() == name)
            .ok_or_else(|| LoggerError::not_found("filter", name))?;
        Ok(filters.remove(index))
    }

    /// Snapshot of the handler list in registration order
    pub fn handlers(&self) -> Vec<Arc<dyn Handler>> {
        self.handlers.read().clone()
    }

    /// Snapshot of the filter list in registration order
    pub fn filters(&self) -> Vec<Arc<dyn Filter>> {
        self.filters.read().clone()
    }
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LoggerConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers: Vec<String> =
            self.handlers.read().iter().map(|h| h.name().to_string()).collect();
        let filters: Vec<String> =
            self.filters.read().iter().map(|x| x.name().to_string()).collect();
        f.debug_struct("LoggerConfiguration")
            .field("minimum_level", &self.minimum_level())
            .field("category_levels", &*self.category_levels.read())
            .field("handlers", &handlers)
            .field("filters", &filters)
            .finish()
    }
}
