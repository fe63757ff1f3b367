//! Sumo Logic Search Job API adapter
//!
//! - [`session`] - cookie jar persisted between runs
//! - [`transport`] - authenticated request/response seam
//! - [`client`] - job submission, status polling and result paging
//! - [`models`] - wire formats

pub mod client;
pub mod models;
pub mod session;
pub mod transport;

pub use client::{page_plan, JobClient, RecordStream, SearchSettings};
pub use session::Session;
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, Transport};
