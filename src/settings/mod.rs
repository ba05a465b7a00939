//! Configuration loaded from the host's `Logging` JSON section
//!
//! ```json
//! { "MinimumLevel": "Information",
//!   "Handlers": [
//!     { "Type": "console", "Enabled": true, "Settings": { "UseColors": true } } ],
//!   "Filters": [
//!     { "Type": "category", "Enabled": true, "Settings": { "Pattern": "^Telegram" } } ] }
//! ```
//!
//! Each descriptor's `Settings` map is parsed once into a typed struct that rejects
//! unknown keys.

pub mod registry;

pub use registry::{ComponentRegistry, FilterBuilder, HandlerBuilder};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::{Formatter, LogLevel, LoggerConfiguration, LoggerError, Result};
use crate::formatters::{JsonFormatter, StructuredFormatter, StructuredOptions, TemplateFormatter};
use crate::handlers::ConsoleTarget;

/// Untyped settings bag of one handler or filter
pub type SettingsMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct LoggingSettings {
    #[serde(default)]
    pub minimum_level: LogLevel,
    #[serde(default)]
    pub category_levels: BTreeMap<String, LogLevel>,
    #[serde(default)]
    pub handlers: Vec<ComponentDescriptor>,
    #[serde(default)]
    pub filters: Vec<ComponentDescriptor>,
}

impl LoggingSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| LoggerError::config("LoggingSettings", e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation("read logging settings", path.display().to_string(), e)
        })?;
        Self::from_json_str(&json)
    }
}

/// `{ "Type": ..., "Enabled": ..., "Settings": { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ComponentDescriptor {
    #[serde(rename = "Type")]
    pub kind: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub settings: SettingsMap,
}

impl ComponentDescriptor {
    pub fn new(kind: impl Into<String>, settings: SettingsMap) -> Self {
        Self {
            kind: kind.into(),
            enabled: true,
            settings,
        }
    }
}

fn enabled_by_default() -> bool {
    true
}

/// Parse a settings bag into its typed form
pub fn parse_settings<T: DeserializeOwned>(component: &str, settings: &SettingsMap) -> Result<T> {
    serde_json::from_value(serde_json::Value::Object(settings.clone()))
        .map_err(|e| LoggerError::config(component, e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    #[default]
    Template,
    Structured,
    Json,
}

/// Build the formatter a handler descriptor asks for
pub fn build_formatter(
    kind: FormatterKind,
    structured: Option<&StructuredOptions>,
) -> Arc<dyn Formatter> {
    match kind {
        FormatterKind::Template => Arc::new(TemplateFormatter::new()),
        FormatterKind::Structured => {
            let options = structured.cloned().unwrap_or_default();
            Arc::new(StructuredFormatter::with_options(options))
        }
        FormatterKind::Json => Arc::new(JsonFormatter::new()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ConsoleSettings {
    #[serde(default = "enabled_by_default")]
    pub use_colors: bool,
    #[serde(default)]
    pub stream: ConsoleTarget,
    #[serde(default)]
    pub formatter: FormatterKind,
    pub template: Option<String>,
    pub structured_options: Option<StructuredOptions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct FileSettings {
    pub log_directory: PathBuf,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    #[serde(default = "default_max_backup_count")]
    pub max_backup_count: usize,
    #[serde(default)]
    pub formatter: FormatterKind,
    pub template: Option<String>,
    pub structured_options: Option<StructuredOptions>,
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

fn default_max_backup_count() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct DatabaseSettings {
    pub connection_string: String,
    #[serde(default = "default_table_name")]
    pub table_name: String,
    /// Run `CREATE TABLE IF NOT EXISTS` while building the handler
    #[serde(default = "enabled_by_default")]
    pub ensure_table: bool,
    pub formatter: Option<FormatterKind>,
    pub template: Option<String>,
    pub structured_options: Option<StructuredOptions>,
}

fn default_table_name() -> String {
    "Logs".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct LevelFilterSettings {
    pub min_level: LogLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct TimeFilterSettings {
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CategoryFilterSettings {
    pub pattern: String,
    #[serde(default = "enabled_by_default")]
    pub is_inclusive: bool,
}

impl LoggerConfiguration {
    /// Build a configuration with the built-in handler and filter kinds
    pub fn from_settings(settings: &LoggingSettings) -> Result<Self> {
        Self::from_settings_with(settings, &ComponentRegistry::default())
    }

    /// Build a configuration, resolving `Type` tags through `registry`.
    ///
    /// Disabled descriptors are skipped. The first descriptor that fails to build
    /// aborts the whole configuration.
    pub fn from_settings_with(
        settings: &LoggingSettings,
        registry: &ComponentRegistry,
    ) -> Result<Self> {
        let configuration = LoggerConfiguration::new().with_minimum_level(settings.minimum_level);
        for (category, level) in &settings.category_levels {
            configuration.set_category_level(category.clone(), *level);
        }

        for descriptor in settings.handlers.iter().filter(|d| d.enabled) {
            configuration.add_handler(registry.build_handler(descriptor)?);
        }
        for descriptor in settings.filters.iter().filter(|d| d.enabled) {
            configuration.add_filter(registry.build_filter(descriptor)?);
        }
        Ok(configuration)
    }
}
