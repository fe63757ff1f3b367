//! Export command implementation
//!
//! This module implements the default command: exporting every window of
//! the requested range to gzip files in the output directory.

use crate::adapters::sumologic::{HttpTransport, JobClient, SearchSettings, Session};
use crate::config::{expand_home, Credentials, ExporterConfig};
use crate::core::export::{ExportEngine, ExportSummary, WindowOutcome};
use crate::core::planner::WindowPlanner;
use crate::core::retry::RetryPolicy;
use crate::core::shutdown::ShutdownSignal;
use crate::core::sink::GzipJsonSink;
use crate::domain::SumoError;
use clap::Args;
use std::sync::Arc;
use std::time::Duration;

/// Date range of the export
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// First day to export (YYYY-MM-DD) [default: 30 days ago]
    #[arg(value_name = "START", conflicts_with = "start")]
    pub start_date: Option<String>,

    /// Day to stop before (YYYY-MM-DD) [default: today]
    #[arg(value_name = "STOP", conflicts_with = "stop")]
    pub stop_date: Option<String>,

    /// First day to export (YYYY-MM-DD)
    #[arg(short, long, value_name = "DATE")]
    pub start: Option<String>,

    /// Day to stop before (YYYY-MM-DD)
    #[arg(short = 't', long, value_name = "DATE")]
    pub stop: Option<String>,
}

impl ExportArgs {
    pub fn start(&self) -> Option<&str> {
        self.start.as_deref().or(self.start_date.as_deref())
    }

    pub fn stop(&self) -> Option<&str> {
        self.stop.as_deref().or(self.stop_date.as_deref())
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config: &ExporterConfig,
        shutdown_signal: ShutdownSignal,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let credentials_path = expand_home(&config.api.credentials_file);
        let credentials = match Credentials::load(&credentials_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load credentials");
                eprintln!("{e}");
                return Ok(exit_code_for(&e));
            }
        };

        let sink = match GzipJsonSink::new(expand_home(&config.export.output_dir)) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to prepare output directory");
                eprintln!("{e}");
                return Ok(exit_code_for(&e));
            }
        };

        let session = Session::load(expand_home(&config.api.cookie_file));
        let transport = match HttpTransport::new(
            credentials,
            session,
            Duration::from_secs(config.api.timeout_seconds),
        ) {
            Ok(t) => t,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create HTTP transport");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let client = JobClient::new(
            Arc::new(transport),
            SearchSettings::from_config(&config.api, &config.search),
            RetryPolicy::from_config(&config.api.retry),
            shutdown_signal.clone(),
        );
        let output_dir = sink.dir().display().to_string();
        let engine = ExportEngine::new(
            client,
            WindowPlanner::from_config(&config.export),
            Arc::new(sink),
            shutdown_signal,
        )
        .with_initial_wait(Duration::from_secs(config.export.initial_wait_seconds));

        println!(
            "Exporting logs from {} to {} into {output_dir}. This may take a while.",
            self.start().unwrap_or("30 days ago"),
            self.stop().unwrap_or("today"),
        );
        println!();

        let summary = match engine.run(self.start(), self.stop()).await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_summary(&summary);
        Ok(exit_code_for_summary(&summary))
    }
}

/// Process exit code for an error that ended the run
pub fn exit_code_for(error: &SumoError) -> i32 {
    match error {
        SumoError::InvalidInput(_) | SumoError::Configuration(_) => 2,
        SumoError::Fatal { .. } => 3,
        SumoError::Interrupted => 130,
        _ => 5,
    }
}

/// Process exit code for a completed run
pub fn exit_code_for_summary(summary: &ExportSummary) -> i32 {
    if summary.interrupted {
        130
    } else if summary.failed > 0 {
        1
    } else {
        0
    }
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("Export Summary:");
    println!("  Windows: {}", summary.total_windows);
    println!("  Written: {}", summary.written);
    println!("  Empty: {}", summary.empty);
    println!("  Failed: {}", summary.failed);
    println!("  Records: {}", summary.total_records);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    for report in summary.failures() {
        if let WindowOutcome::Failed { reason } = &report.outcome {
            println!("  - {}: {reason}", report.label());
        }
    }

    if summary.interrupted {
        println!("Export interrupted. Run the same range again to fetch the remaining windows.");
    } else if summary.failed > 0 {
        println!("Export completed with failures");
    } else {
        println!("Finished downloading logs!");
    }
}
