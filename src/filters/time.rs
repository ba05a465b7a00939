//! Time-of-day window filter

use chrono::{NaiveTime, Timelike};

use crate::core::{Filter, LogEntry, LoggerError, Result};

/// Passes entries whose own timestamp (UTC time of day) lies in `[start, end]`.
///
/// When `start > end` the window wraps midnight, so `22:00..=06:00` covers the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFilter {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeFilter {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse `HH:mm:ss` (or `HH:mm`) bounds
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self::new(parse_time(start)?, parse_time(end)?))
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    fn contains(&self, time: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= time && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|e| LoggerError::config("TimeFilter", format!("invalid time '{}': {}", value, e)))
}

impl Filter for TimeFilter {
    fn is_enabled(&self, entry: &LogEntry) -> bool {
        // whole-second precision
        let time = entry.timestamp.time();
        let time = time.with_nanosecond(0).unwrap_or(time);
        self.contains(time)
    }

    fn name(&self) -> &str {
        "time"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use chrono::{TimeZone, Utc};

    fn at(h: u32, m: u32, s: u32) -> LogEntry {
        LogEntry::new("x", LogLevel::Info, "m")
            .with_timestamp(Utc.with_ymd_and_hms(2025, 6, 1, h, m, s).unwrap())
    }

    #[test]
    fn test_inclusive_bounds() {
        let filter = TimeFilter::parse("08:00:00", "20:00:00").unwrap();
        assert!(filter.is_enabled(&at(8, 0, 0)));
        assert!(filter.is_enabled(&at(13, 30, 0)));
        assert!(filter.is_enabled(&at(20, 0, 0)));
        assert!(!filter.is_enabled(&at(20, 0, 1)));
        assert!(!filter.is_enabled(&at(7, 59, 59)));
    }

    #[test]
    fn test_window_wraps_midnight() {
        let filter = TimeFilter::parse("22:00", "06:00").unwrap();
        assert!(filter.is_enabled(&at(23, 15, 0)));
        assert!(filter.is_enabled(&at(3, 0, 0)));
        assert!(!filter.is_enabled(&at(12, 0, 0)));
    }

    #[test]
    fn test_uses_entry_timestamp() {
        let filter = TimeFilter::parse("00:00:00", "00:00:01").unwrap();
        let entry = at(0, 0, 0);
        assert!(filter.is_enabled(&entry));
    }

    #[test]
    fn test_invalid_time() {
        assert!(matches!(
            TimeFilter::parse("25:00", "06:00"),
            Err(LoggerError::InvalidConfiguration { .. })
        ));
    }
}
