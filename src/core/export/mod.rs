//! Export orchestration
//!
//! - [`engine`] - per-window job lifecycle and failure isolation
//! - [`summary`] - run summary and reporting

pub mod engine;
pub mod summary;

pub use engine::{ExportEngine, DEFAULT_INITIAL_WAIT};
pub use summary::{ExportSummary, WindowOutcome, WindowReport};
