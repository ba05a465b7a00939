//! Handler trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// Sink that renders an entry (through a formatter) and delivers it somewhere.
///
/// Handlers are shared between loggers and called concurrently, so `handle` takes
/// `&self`; implementations serialize their own I/O.
pub trait Handler: Send + Sync {
    fn handle(&self, entry: &LogEntry) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Name used for removal and in failure reports
    fn name(&self) -> &str;
}
