//! Core business logic for sumo-export.
//!
//! # Modules
//!
//! - [`planner`] - splitting a date range into windows
//! - [`export`] - the per-window export engine and its summary
//! - [`retry`] - retry policy wrapped around every remote call
//! - [`shutdown`] - cooperative cancellation
//! - [`sink`] - destinations for exported records
//!
//! # Export Workflow
//!
//! 1. **Plan**: turn the requested dates into ordered day windows
//! 2. **Submit**: create a search job for the window
//! 3. **Wait**: pause for the grace period, then poll until the job is done
//! 4. **Download**: page through the results into the sink
//! 5. **Report**: log the export summary
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sumo_export::adapters::sumologic::JobClient;
//! use sumo_export::core::export::ExportEngine;
//! use sumo_export::core::planner::WindowPlanner;
//! use sumo_export::core::sink::GzipJsonSink;
//!
//! # async fn example(client: JobClient) -> Result<(), Box<dyn std::error::Error>> {
//! let (_tx, shutdown) = tokio::sync::watch::channel(false);
//! let engine = ExportEngine::new(
//!     client,
//!     WindowPlanner::default(),
//!     Arc::new(GzipJsonSink::new("exports")?),
//!     shutdown,
//! );
//! let summary = engine.run(Some("2024-01-01"), Some("2024-01-08")).await?;
//! println!("Exported {} records", summary.total_records);
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod planner;
pub mod retry;
pub mod shutdown;
pub mod sink;
