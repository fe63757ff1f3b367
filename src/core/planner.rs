//! Window planning
//!
//! Turns the operator's optional `start`/`stop` dates into an ordered list of
//! contiguous [`TimeWindow`]s. Nothing here touches the network, so a bad
//! date is rejected before any job is submitted.

use crate::config::ExportConfig;
use crate::domain::window::LABEL_FORMAT;
use crate::domain::{Result, SumoError, TimeWindow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, TimeZone, Utc};

/// Splits a date range into fixed-width windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlanner {
    increment: TimeDelta,
    default_range: TimeDelta,
}

impl WindowPlanner {
    pub fn new(increment: TimeDelta, default_range: TimeDelta) -> Self {
        Self {
            increment,
            default_range,
        }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(
            TimeDelta::days(i64::from(config.window_days.max(1))),
            TimeDelta::days(i64::from(config.default_range_days)),
        )
    }

    pub fn increment(&self) -> TimeDelta {
        self.increment
    }

    /// Plan the windows covering `[start, stop)`
    ///
    /// An omitted `start` means `default_range` before `now`, an omitted
    /// `stop` means today; both are taken at midnight UTC. The last window is
    /// clipped to `stop`, and `start >= stop` yields no windows.
    ///
    /// # Errors
    ///
    /// Returns [`SumoError::InvalidInput`] if a date is malformed or lies in the future.
    pub fn plan(
        &self,
        start: Option<&str>,
        stop: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<TimeWindow>> {
        let start = match start {
            Some(value) => parse_date("start", value, now)?,
            None => start_of_day(now - self.default_range),
        };
        let stop = match stop {
            Some(value) => parse_date("stop", value, now)?,
            None => start_of_day(now),
        };

        if start >= stop {
            tracing::warn!(
                start = %start.format(LABEL_FORMAT),
                stop = %stop.format(LABEL_FORMAT),
                "Start is not before stop, nothing to export"
            );
            return Ok(Vec::new());
        }

        let mut windows = Vec::new();
        let mut cursor = start;
        while cursor < stop {
            let end = (cursor + self.increment).min(stop);
            windows.push(TimeWindow::new(cursor, end)?);
            cursor = end;
        }

        tracing::debug!(count = windows.len(), "Planned export windows");
        Ok(windows)
    }
}

impl Default for WindowPlanner {
    fn default() -> Self {
        Self::from_config(&ExportConfig::default())
    }
}

fn parse_date(name: &str, value: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), LABEL_FORMAT).map_err(|_| {
        SumoError::InvalidInput(format!(
            "Invalid {name} date '{value}'. Format must be YYYY-MM-DD"
        ))
    })?;
    let parsed = midnight(date);

    if parsed > now {
        return Err(SumoError::InvalidInput(format!(
            "The {name} date '{value}' must be in the past"
        )));
    }

    Ok(parsed)
}

fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    midnight(ts.date_naive())
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    let naive: NaiveDateTime = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    Utc.from_utc_datetime(&naive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 13, 45, 12).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_explicit_range_is_contiguous() {
        let windows = WindowPlanner::default()
            .plan(Some("2024-01-01"), Some("2024-01-05"), now())
            .unwrap();

        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].start(), day(2024, 1, 1));
        assert_eq!(windows[3].end(), day(2024, 1, 5));
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start());
            assert!(pair[0].start() < pair[1].start());
        }
        assert_eq!(
            windows.iter().map(TimeWindow::label).collect::<Vec<_>>(),
            vec!["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"]
        );
    }

    #[test]
    fn test_defaults_cover_thirty_days_ending_today() {
        let windows = WindowPlanner::default().plan(None, None, now()).unwrap();

        assert_eq!(windows.len(), 30);
        assert_eq!(windows[0].start(), day(2024, 2, 14));
        assert_eq!(windows[29].end(), day(2024, 3, 15));
    }

    #[test]
    fn test_start_only_runs_to_today() {
        let windows = WindowPlanner::default()
            .plan(Some("2024-03-13"), None, now())
            .unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].end(), day(2024, 3, 15));
    }

    #[test]
    fn test_final_window_is_clipped() {
        let planner = WindowPlanner::new(TimeDelta::days(3), TimeDelta::days(30));
        let windows = planner
            .plan(Some("2024-01-01"), Some("2024-01-08"), now())
            .unwrap();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[2].start(), day(2024, 1, 7));
        assert_eq!(windows[2].end(), day(2024, 1, 8));
        assert_eq!(windows[2].duration(), TimeDelta::days(1));
    }

    #[test_case("2024-01-05", "2024-01-05" ; "equal bounds")]
    #[test_case("2024-01-06", "2024-01-05" ; "start after stop")]
    fn test_empty_plan(start: &str, stop: &str) {
        let windows = WindowPlanner::default()
            .plan(Some(start), Some(stop), now())
            .unwrap();
        assert!(windows.is_empty());
    }

    #[test_case("2024/01/05" ; "slashes")]
    #[test_case("05-01-2024" ; "day first")]
    #[test_case("yesterday" ; "word")]
    #[test_case("2024-02-30" ; "impossible day")]
    fn test_malformed_date(value: &str) {
        let err = WindowPlanner::default()
            .plan(Some(value), None, now())
            .unwrap_err();
        match err {
            SumoError::InvalidInput(message) => assert!(message.contains("YYYY-MM-DD")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_future_date_rejected() {
        let err = WindowPlanner::default()
            .plan(Some("2024-01-01"), Some("2024-03-16"), now())
            .unwrap_err();
        match err {
            SumoError::InvalidInput(message) => assert!(message.contains("in the past")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_today_is_not_future() {
        let windows = WindowPlanner::default()
            .plan(Some("2024-03-14"), Some("2024-03-15"), now())
            .unwrap();
        assert_eq!(windows.len(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = ExportConfig {
            window_days: 2,
            default_range_days: 7,
            ..Default::default()
        };
        let planner = WindowPlanner::from_config(&config);
        assert_eq!(planner.increment(), TimeDelta::days(2));

        let windows = planner.plan(None, None, now()).unwrap();
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].start(), day(2024, 3, 8));
    }
}
