//! Export engine - main orchestrator for the export process
//!
//! Plans the windows, then walks them strictly in order: submit a job, give
//! the service its grace period, wait for the count, and stream the records
//! into the sink. Each window reaches a terminal outcome before the next one
//! is submitted.

use super::summary::{ExportSummary, WindowOutcome};
use crate::adapters::sumologic::JobClient;
use crate::core::planner::WindowPlanner;
use crate::core::shutdown::{is_shutdown, sleep_or_shutdown, ShutdownSignal};
use crate::core::sink::RecordSink;
use crate::domain::{Result, SumoError, TimeWindow};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default pause between submitting a job and asking for its count
pub const DEFAULT_INITIAL_WAIT: Duration = Duration::from_secs(60);

/// Export engine
pub struct ExportEngine {
    client: JobClient,
    planner: WindowPlanner,
    sink: Arc<dyn RecordSink>,
    initial_wait: Duration,
    shutdown: ShutdownSignal,
}

impl ExportEngine {
    pub fn new(
        client: JobClient,
        planner: WindowPlanner,
        sink: Arc<dyn RecordSink>,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            client,
            planner,
            sink,
            initial_wait: DEFAULT_INITIAL_WAIT,
            shutdown,
        }
    }

    pub fn with_initial_wait(mut self, initial_wait: Duration) -> Self {
        self.initial_wait = initial_wait;
        self
    }

    /// Export `[start, stop)` relative to the current time
    pub async fn run(&self, start: Option<&str>, stop: Option<&str>) -> Result<ExportSummary> {
        self.run_at(start, stop, Utc::now()).await
    }

    /// Export `[start, stop)` with an explicit notion of "now"
    ///
    /// # Errors
    ///
    /// - [`SumoError::InvalidInput`] from planning, before any remote call
    /// - [`SumoError::Fatal`] and [`SumoError::Configuration`] stop the run
    ///
    /// A shutdown signal ends the run early with `interrupted` set on the
    /// summary. Windows that exhaust their retries or fail in the sink are
    /// recorded as failed and the run continues.
    pub async fn run_at(
        &self,
        start: Option<&str>,
        stop: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ExportSummary> {
        let started = Instant::now();
        let windows = self.planner.plan(start, stop, now)?;
        let total = windows.len();
        let mut summary = ExportSummary::new(total);

        tracing::info!(windows = total, "Starting export");

        for (index, window) in windows.into_iter().enumerate() {
            if is_shutdown(&self.shutdown) {
                summary.interrupted = true;
                break;
            }

            crate::log_window_start!(window.label(), index + 1, total);

            match self.export_window(&window).await {
                Ok(outcome) => summary.record(window, outcome),
                Err(SumoError::Interrupted) => {
                    summary.interrupted = true;
                    break;
                }
                Err(e) if e.aborts_run() => {
                    tracing::error!(window = %window.label(), error = %e, "Aborting export");
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(window = %window.label(), error = %e, "Window failed");
                    summary.record(
                        window,
                        WindowOutcome::Failed {
                            reason: e.to_string(),
                        },
                    );
                }
            }
        }

        if summary.interrupted {
            tracing::warn!("Shutdown requested, stopping export");
        }

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    async fn export_window(&self, window: &TimeWindow) -> Result<WindowOutcome> {
        let job = self.client.create_job(window).await?;

        sleep_or_shutdown(self.initial_wait, &self.shutdown).await?;

        let status = self.client.poll_until_done(&job).await?;
        let count = status.message_count;
        if count == 0 {
            tracing::info!(window = %window.label(), "No logs found");
            return Ok(WindowOutcome::Empty);
        }

        tracing::info!(window = %window.label(), count, "Downloading {count} logs");
        let records = self.client.fetch_records(&job, count);
        let written = self.sink.write(&window.label(), records).await?;

        if written != count {
            tracing::warn!(
                window = %window.label(),
                expected = count,
                written,
                "Record count differs from job message count"
            );
        }

        Ok(WindowOutcome::Written { records: written })
    }
}
