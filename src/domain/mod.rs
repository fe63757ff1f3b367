//! Domain models and types for sumo-export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Time windows** ([`TimeWindow`]) - half-open UTC ranges, one search job each
//! - **Job handles** ([`SearchJob`], [`JobStatus`], [`JobState`])
//! - **Records** ([`LogRecord`]) - opaque JSON objects passed through unchanged
//! - **Error types** ([`SumoError`], [`ApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use sumo_export::domain::TimeWindow;
//! use chrono::{TimeZone, Utc};
//!
//! # fn example() -> sumo_export::domain::Result<()> {
//! let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
//! let window = TimeWindow::new(start, start + chrono::TimeDelta::days(1))?;
//! assert_eq!(window.label(), "2024-01-02");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod job;
pub mod result;
pub mod window;

pub use errors::{ApiError, SumoError};
pub use job::{JobState, JobStatus, LogRecord, SearchJob};
pub use result::Result;
pub use window::TimeWindow;
