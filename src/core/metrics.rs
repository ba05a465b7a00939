//! Logger metrics for observability
//!
//! Counters describing what happened to each log call: rejected by the level
//! threshold, rejected by a filter, dispatched to handlers, and how many handler
//! invocations failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use tempmail_logging::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Calls below the minimum level
    below_threshold: AtomicU64,

    /// Entries rejected by at least one filter
    filtered: AtomicU64,

    /// Entries handed to the handler chain
    dispatched: AtomicU64,

    /// Individual handler invocations that returned an error or panicked
    handler_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            below_threshold: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            dispatched: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn below_threshold(&self) -> u64 {
        self.below_threshold.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn handler_failures(&self) -> u64 {
        self.handler_failures.load(Ordering::Relaxed)
    }

    /// Record a call rejected by the level threshold; returns the previous value
    #[inline]
    pub fn record_below_threshold(&self) -> u64 {
        self.below_threshold.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_handler_failure(&self) -> u64 {
        self.handler_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of handler invocations that failed, as a percentage of dispatched entries
    ///
    /// Returns 0.0 if nothing has been dispatched.
    pub fn failure_rate(&self) -> f64 {
        let dispatched = self.dispatched() as f64;
        if dispatched == 0.0 {
            0.0
        } else {
            (self.handler_failures() as f64 / dispatched) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.below_threshold.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.dispatched.store(0, Ordering::Relaxed);
        self.handler_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            below_threshold: AtomicU64::new(self.below_threshold()),
            filtered: AtomicU64::new(self.filtered()),
            dispatched: AtomicU64::new(self.dispatched()),
            handler_failures: AtomicU64::new(self.handler_failures()),
        }
    }
}
