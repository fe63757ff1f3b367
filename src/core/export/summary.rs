//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::domain::TimeWindow;
use std::time::Duration;

/// Terminal outcome of one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOutcome {
    /// Records were streamed into the sink
    Written { records: u64 },

    /// The job reported no matching records
    Empty,

    /// Retries were exhausted or the sink failed
    Failed { reason: String },
}

/// Outcome of one window, in run order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowReport {
    pub window: TimeWindow,
    pub outcome: WindowOutcome,
}

impl WindowReport {
    pub fn label(&self) -> String {
        self.window.label()
    }
}

/// Summary of an export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Number of windows the planner produced
    pub total_windows: usize,

    /// Windows written to the sink
    pub written: usize,

    /// Windows with no records
    pub empty: usize,

    /// Windows that failed
    pub failed: usize,

    /// Records written across all windows
    pub total_records: u64,

    /// Duration of the run
    pub duration: Duration,

    /// Per-window outcomes
    pub outcomes: Vec<WindowReport>,

    /// The run stopped early on a shutdown signal
    pub interrupted: bool,
}

impl ExportSummary {
    /// Create an empty summary for a run of `total_windows`
    pub fn new(total_windows: usize) -> Self {
        Self {
            total_windows,
            ..Default::default()
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record the terminal outcome of a window
    pub fn record(&mut self, window: TimeWindow, outcome: WindowOutcome) {
        match &outcome {
            WindowOutcome::Written { records } => {
                self.written += 1;
                self.total_records += records;
            }
            WindowOutcome::Empty => self.empty += 1,
            WindowOutcome::Failed { .. } => self.failed += 1,
        }
        self.outcomes.push(WindowReport { window, outcome });
    }

    /// Windows that reached a terminal outcome
    pub fn processed(&self) -> usize {
        self.outcomes.len()
    }

    /// Failed window reports
    pub fn failures(&self) -> impl Iterator<Item = &WindowReport> {
        self.outcomes
            .iter()
            .filter(|report| matches!(report.outcome, WindowOutcome::Failed { .. }))
    }

    /// No window failed and the run was not interrupted
    pub fn is_successful(&self) -> bool {
        self.failed == 0 && !self.interrupted
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_windows = self.total_windows,
            written = self.written,
            empty = self.empty,
            failed = self.failed,
            total_records = self.total_records,
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        if self.interrupted {
            tracing::warn!(
                processed = self.processed(),
                remaining = self.total_windows.saturating_sub(self.processed()),
                "Export interrupted before all windows were processed"
            );
        }

        for report in self.failures() {
            if let WindowOutcome::Failed { reason } = &report.outcome {
                tracing::warn!(window = %report.label(), reason = %reason, "Window failed");
            }
        }
    }
}
