//! Last-resort sink for failures inside the logging pipeline
//!
//! Handlers, formatters and providers cannot report their own failures through the
//! logger that invoked them. They report here instead. By default reports go to stderr;
//! a host (or a test) can install a hook to capture them.

use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

/// One failure report from inside the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackReport {
    /// Component that failed, e.g. `handler 'console'` or `provider 'sentry'`
    pub source: String,
    pub message: String,
}

impl fmt::Display for FallbackReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[LOGGER ERROR] {}: {}", self.source, self.message)
    }
}

pub type FallbackHook = Arc<dyn Fn(&FallbackReport) + Send + Sync>;

fn hook_slot() -> &'static RwLock<Option<FallbackHook>> {
    static HOOK: OnceLock<RwLock<Option<FallbackHook>>> = OnceLock::new();
    HOOK.get_or_init(|| RwLock::new(None))
}

/// Route fallback reports to `hook` instead of stderr
pub fn set_hook(hook: FallbackHook) {
    *hook_slot().write() = Some(hook);
}

/// Restore the stderr sink
pub fn reset_hook() {
    *hook_slot().write() = None;
}

/// Report a pipeline failure. Never fails and never panics.
pub fn report(source: impl Into<String>, message: impl fmt::Display) {
    let report = FallbackReport {
        source: source.into(),
        message: message.to_string(),
    };

    let hook = hook_slot().read().clone();
    match hook {
        Some(hook) => {
            let outcome = catch_unwind(AssertUnwindSafe(|| hook(&report)));
            if outcome.is_err() {
                eprintln!("{} (fallback hook panicked)", report);
            }
        }
        None => eprintln!("{}", report),
    }
}

/// In-memory sink for fallback reports, mostly useful in tests
///
/// ```
/// use tempmail_logging::core::fallback::{self, FallbackCollector};
///
/// let collector = FallbackCollector::new();
/// fallback::set_hook(collector.hook());
/// fallback::report("handler 'file'", "disk full");
/// assert_eq!(collector.reports_from("handler 'file'").len(), 1);
/// fallback::reset_hook();
/// ```
#[derive(Debug, Clone, Default)]
pub struct FallbackCollector {
    reports: Arc<Mutex<Vec<FallbackReport>>>,
}

impl FallbackCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hook that appends to this collector
    pub fn hook(&self) -> FallbackHook {
        let reports = Arc::clone(&self.reports);
        Arc::new(move |report: &FallbackReport| reports.lock().push(report.clone()))
    }

    pub fn reports(&self) -> Vec<FallbackReport> {
        self.reports.lock().clone()
    }

    /// Reports whose source mentions `needle`
    pub fn reports_from(&self, needle: &str) -> Vec<FallbackReport> {
        self.reports
            .lock()
            .iter()
            .filter(|r| r.source.contains(needle))
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

/// Collector installed once for the whole unit-test binary.
///
/// Tests share the global hook, so each one filters by a source name it owns.
#[cfg(test)]
pub(crate) fn test_collector() -> &'static FallbackCollector {
    static COLLECTOR: OnceLock<FallbackCollector> = OnceLock::new();
    COLLECTOR.get_or_init(|| {
        let collector = FallbackCollector::new();
        set_hook(collector.hook());
        collector
    })
}

/// Extract a readable message from a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        let report = FallbackReport {
            source: "handler 'file'".into(),
            message: "disk full".into(),
        };
        assert_eq!(report.to_string(), "[LOGGER ERROR] handler 'file': disk full");
    }

    #[test]
    fn test_panic_message_variants() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static str");
        assert_eq!(panic_message(payload.as_ref()), "static str");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "Unknown panic");
    }

    #[test]
    fn test_collector_receives_reports() {
        let collector = test_collector();
        report("fallback-test-source", "first");
        report("fallback-test-source", format!("second {}", 2));

        let reports = collector.reports_from("fallback-test-source");
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].message, "second 2");
    }
}
