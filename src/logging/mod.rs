//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use sumo_export::logging::init_logging;
//! use sumo_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a retry attempt of a search API call
///
/// # Example
///
/// ```no_run
/// use sumo_export::log_retry_attempt;
/// use std::time::Duration;
///
/// let max_attempts: Option<u32> = None;
/// log_retry_attempt!("create job", 2, max_attempts, Duration::from_secs(1), "timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($operation:expr, $attempt:expr, $max_attempts:expr, $delay:expr, $reason:expr) => {
        tracing::warn!(
            operation = $operation,
            attempt = $attempt,
            max_attempts = ?$max_attempts,
            delay_ms = $delay.as_millis() as u64,
            reason = %$reason,
            "Retrying operation"
        );
    };
}

/// Log the start of a window export
///
/// # Example
///
/// ```no_run
/// use sumo_export::log_window_start;
///
/// log_window_start!("2024-01-02", 1, 30);
/// ```
#[macro_export]
macro_rules! log_window_start {
    ($label:expr, $index:expr, $total:expr) => {
        tracing::info!(
            window = %$label,
            index = $index,
            total = $total,
            "Exporting window"
        );
    };
}
