//! Time windows requested from the search API

use super::errors::SumoError;
use super::result::Result;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::fmt;

/// Format used for `from`/`to` in search job requests
const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format used for window labels and export file names
pub const LABEL_FORMAT: &str = "%Y-%m-%d";

/// Half-open UTC range `[start, end)` with whole-second precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window, truncating both bounds to the second
    ///
    /// # Errors
    ///
    /// Returns [`SumoError::InvalidInput`] if `start` is not strictly before `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let start = truncate_to_second(start);
        let end = truncate_to_second(end);
        if start >= end {
            return Err(SumoError::InvalidInput(format!(
                "window start {start} must be before end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Start date as `YYYY-MM-DD`, used to name the export file
    pub fn label(&self) -> String {
        self.start.format(LABEL_FORMAT).to_string()
    }

    /// Start bound as sent to the search API
    pub fn api_from(&self) -> String {
        self.start.format(API_TIMESTAMP_FORMAT).to_string()
    }

    /// End bound as sent to the search API
    pub fn api_to(&self) -> String {
        self.end.format(API_TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.api_from(), self.api_to())
    }
}

fn truncate_to_second(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::seconds(1)).unwrap_or(ts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_window_truncates_to_seconds() {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
            + TimeDelta::milliseconds(750);
        let end = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let window = TimeWindow::new(start, end).unwrap();

        assert_eq!(window.api_from(), "2024-01-02T00:00:00");
        assert_eq!(window.api_to(), "2024-01-03T00:00:00");
        assert_eq!(window.label(), "2024-01-02");
        assert_eq!(window.duration(), TimeDelta::days(1));
    }

    #[test]
    fn test_window_rejects_empty_range() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert!(matches!(
            TimeWindow::new(ts, ts),
            Err(SumoError::InvalidInput(_))
        ));
        assert!(TimeWindow::new(ts, ts - TimeDelta::hours(1)).is_err());
    }

    #[test]
    fn test_window_display() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let window = TimeWindow::new(start, start + TimeDelta::hours(6)).unwrap();
        assert_eq!(
            window.to_string(),
            "[2024-03-01T00:00:00, 2024-03-01T06:00:00)"
        );
    }
}
