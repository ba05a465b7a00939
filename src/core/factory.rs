//! Named logger cache and external provider hooks

use dashmap::DashMap;
use parking_lot::RwLock;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::configuration::LoggerConfiguration;
use super::error::{LoggerError, Result};
use super::fallback;
use super::logger::Logger;

/// External logging backend that is told about every logger the factory creates
pub trait LoggerProvider: Send + Sync {
    fn name(&self) -> &str;

    fn create_logger(&self, name: &str) -> Result<Arc<Logger>>;

    fn dispose(&self) -> Result<()> {
        Ok(())
    }
}

/// Creates loggers on demand and hands out the same instance for the same name.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use tempmail_logging::prelude::*;
///
/// let factory = LoggerFactory::new(LoggerConfiguration::new().shared());
/// let a = factory.create_logger("Telegram.Core");
/// let b = factory.create_logger("Telegram.Core");
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct LoggerFactory {
    configuration: Arc<LoggerConfiguration>,
    loggers: DashMap<String, Arc<Logger>>,
    providers: RwLock<Vec<Arc<dyn LoggerProvider>>>,
    disposed: AtomicBool,
}

impl LoggerFactory {
    pub fn new(configuration: Arc<LoggerConfiguration>) -> Self {
        Self {
            configuration,
            loggers: DashMap::new(),
            providers: RwLock::new(Vec::new()),
            disposed: AtomicBool::new(false),
        }
    }

    pub fn configuration(&self) -> &Arc<LoggerConfiguration> {
        &self.configuration
    }

    /// Get or create the logger for `name`.
    ///
    /// Concurrent callers for the same name all receive the one instance that was
    /// constructed; the shard lock held by the entry API makes construction happen once.
    pub fn create_logger(&self, name: &str) -> Arc<Logger> {
        if let Some(existing) = self.loggers.get(name) {
            return Arc::clone(existing.value());
        }

        let mut created = false;
        let logger = self
            .loggers
            .entry(name.to_string())
            .or_insert_with(|| {
                created = true;
                Arc::new(Logger::new(name, Arc::clone(&self.configuration)))
            })
            .value()
            .clone();

        if created {
            self.notify_providers(name);
        }
        logger
    }

    /// Logger named after the type `T`
    pub fn create_logger_for<T: ?Sized>(&self) -> Arc<Logger> {
        self.create_logger(std::any::type_name::<T>())
    }

    /// Every provider is asked for a logger of the same name. The result is not used.
    fn notify_providers(&self, name: &str) {
        if self.disposed.load(Ordering::Acquire) {
            return;
        }
        let providers = self.providers.read().clone();
        for provider in providers {
            let result = catch_unwind(AssertUnwindSafe(|| provider.create_logger(name)));
            match result {
                Ok(Ok(_discarded)) => {}
                Ok(Err(e)) => {
                    fallback::report(
                        format!("provider '{}'", provider.name()),
                        format!("create_logger('{}') failed: {}", name, e),
                    );
                }
                Err(panic_info) => {
                    fallback::report(
                        format!("provider '{}'", provider.name()),
                        format!(
                            "create_logger('{}') panicked: {}",
                            name,
                            fallback::panic_message(panic_info.as_ref())
                        ),
                    );
                }
            }
        }
    }

    pub fn add_provider(&self, provider: Arc<dyn LoggerProvider>) {
        self.providers.write().push(provider);
    }

    /// Providers cannot be removed once added
    pub fn remove_provider(&self, name: &str) -> Result<()> {
        Err(LoggerError::unsupported(format!("remove_provider('{}')", name)))
    }

    pub fn provider_count(&self) -> usize {
        self.providers.read().len()
    }

    /// Names of the loggers created so far, sorted
    pub fn loggers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Dispose every provider once; later calls do nothing.
    ///
    /// A failing provider is reported and the remaining ones are still disposed.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }

        let providers = self.providers.read().clone();
        for provider in providers {
            let result = catch_unwind(AssertUnwindSafe(|| provider.dispose()));
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    let source = format!("provider '{}'", provider.name());
                    fallback::report(source, format!("dispose failed: {}", e));
                }
                Err(panic_info) => {
                    let panic = fallback::panic_message(panic_info.as_ref());
                    fallback::report(
                        format!("provider '{}'", provider.name()),
                        format!("dispose panicked: {}", panic),
                    );
                }
            }
        }
    }
}

impl Drop for LoggerFactory {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for LoggerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerFactory")
            .field("loggers", &self.loggers())
            .field("providers", &self.provider_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
