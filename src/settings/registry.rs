//! Type-tag to component builder mapping

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{
    build_formatter, parse_settings, CategoryFilterSettings, ComponentDescriptor, ConsoleSettings,
    LevelFilterSettings, SettingsMap, TimeFilterSettings,
};
use crate::core::{Filter, Handler, LoggerError, Result};
use crate::filters::{CategoryFilter, LevelFilter, TimeFilter};
use crate::handlers::ConsoleHandler;

pub type HandlerBuilder = Arc<dyn Fn(&SettingsMap) -> Result<Arc<dyn Handler>> + Send + Sync>;
pub type FilterBuilder = Arc<dyn Fn(&SettingsMap) -> Result<Arc<dyn Filter>> + Send + Sync>;

/// Builders for handler and filter kinds, keyed by lowercase type tag.
///
/// [`ComponentRegistry::default`] knows `console`, `file`, `database`, `level`, `time`
/// and `category`; hosts can register more.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tempmail_logging::core::Handler;
/// use tempmail_logging::handlers::MemoryHandler;
/// use tempmail_logging::settings::{ComponentDescriptor, ComponentRegistry, SettingsMap};
///
/// let mut registry = ComponentRegistry::default();
/// registry.register_handler("memory", |_settings| {
///     let handler: Arc<dyn Handler> = Arc::new(MemoryHandler::new());
///     Ok(handler)
/// });
///
/// let handler = registry
///     .build_handler(&ComponentDescriptor::new("Memory", SettingsMap::new()))
///     .unwrap();
/// assert_eq!(handler.name(), "memory");
/// ```
#[derive(Clone)]
pub struct ComponentRegistry {
    handlers: HashMap<String, HandlerBuilder>,
    filters: HashMap<String, FilterBuilder>,
}

impl ComponentRegistry {
    /// Registry with no kinds at all
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            filters: HashMap::new(),
        }
    }

    pub fn register_handler<F>(&mut self, kind: &str, builder: F)
    where
        F: Fn(&SettingsMap) -> Result<Arc<dyn Handler>> + Send + Sync + 'static,
    {
        self.handlers.insert(kind.to_ascii_lowercase(), Arc::new(builder));
    }

    pub fn register_filter<F>(&mut self, kind: &str, builder: F)
    where
        F: Fn(&SettingsMap) -> Result<Arc<dyn Filter>> + Send + Sync + 'static,
    {
        self.filters.insert(kind.to_ascii_lowercase(), Arc::new(builder));
    }

    pub fn build_handler(&self, descriptor: &ComponentDescriptor) -> Result<Arc<dyn Handler>> {
        let builder = self
            .handlers
            .get(&descriptor.kind.to_ascii_lowercase())
            .ok_or_else(|| LoggerError::unknown_component("handler", &descriptor.kind))?;
        builder(&descriptor.settings)
    }

    pub fn build_filter(&self, descriptor: &ComponentDescriptor) -> Result<Arc<dyn Filter>> {
        let builder = self
            .filters
            .get(&descriptor.kind.to_ascii_lowercase())
            .ok_or_else(|| LoggerError::unknown_component("filter", &descriptor.kind))?;
        builder(&descriptor.settings)
    }

    pub fn handler_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.handlers.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    pub fn filter_kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.filters.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

fn console_handler(settings: &SettingsMap) -> Result<Arc<dyn Handler>> {
    let settings: ConsoleSettings = parse_settings("console handler", settings)?;
    let mut handler = ConsoleHandler::with_target(settings.stream)
        .with_colors(settings.use_colors)
        .with_formatter(build_formatter(settings.formatter, settings.structured_options.as_ref()));
    if let Some(template) = settings.template {
        handler = handler.with_template(template);
    }
    Ok(Arc::new(handler))
}

#[cfg(feature = "file")]
fn file_handler(settings: &SettingsMap) -> Result<Arc<dyn Handler>> {
    use crate::handlers::FileHandler;

    let settings: super::FileSettings = parse_settings("file handler", settings)?;
    let formatter = build_formatter(settings.formatter, settings.structured_options.as_ref());
    let mut handler = FileHandler::new(
        &settings.log_directory,
        settings.max_file_size,
        settings.max_backup_count,
    )?
    .with_formatter(formatter);
    if let Some(template) = settings.template {
        handler = handler.with_template(template);
    }
    Ok(Arc::new(handler))
}

#[cfg(feature = "database")]
fn database_handler(settings: &SettingsMap) -> Result<Arc<dyn Handler>> {
    use crate::handlers::DatabaseHandler;

    let settings: super::DatabaseSettings = parse_settings("database handler", settings)?;
    let mut handler = DatabaseHandler::new(settings.connection_string, settings.table_name)?;
    if let Some(kind) = settings.formatter {
        let formatter = build_formatter(kind, settings.structured_options.as_ref());
        handler = handler.with_formatter(formatter);
    }
    if let Some(template) = settings.template {
        handler = handler.with_template(template);
    }
    if settings.ensure_table {
        handler.ensure_table()?;
    }
    Ok(Arc::new(handler))
}

fn level_filter(settings: &SettingsMap) -> Result<Arc<dyn Filter>> {
    let settings: LevelFilterSettings = parse_settings("level filter", settings)?;
    Ok(Arc::new(LevelFilter::new(settings.min_level)))
}

fn time_filter(settings: &SettingsMap) -> Result<Arc<dyn Filter>> {
    let settings: TimeFilterSettings = parse_settings("time filter", settings)?;
    Ok(Arc::new(TimeFilter::parse(&settings.start_time, &settings.end_time)?))
}

fn category_filter(settings: &SettingsMap) -> Result<Arc<dyn Filter>> {
    let settings: CategoryFilterSettings = parse_settings("category filter", settings)?;
    Ok(Arc::new(CategoryFilter::new(&settings.pattern, settings.is_inclusive)?))
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_handler("console", console_handler);
        #[cfg(feature = "file")]
        registry.register_handler("file", file_handler);
        #[cfg(feature = "database")]
        registry.register_handler("database", database_handler);
        registry.register_filter("level", level_filter);
        registry.register_filter("time", time_filter);
        registry.register_filter("category", category_filter);
        registry
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("handlers", &self.handler_kinds())
            .field("filters", &self.filter_kinds())
            .finish()
    }
}
