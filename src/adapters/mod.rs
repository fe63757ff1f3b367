//! External system integrations for sumo-export.
//!
//! - [`sumologic`] - the remote search service
//!
//! The job client only talks to the network through the
//! [`sumologic::Transport`] trait, so tests can drive it with a scripted
//! implementation instead of a live HTTP server.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use sumo_export::adapters::sumologic::{HttpTransport, JobClient, SearchSettings, Session};
//! use sumo_export::config::{Credentials, ExporterConfig};
//! use sumo_export::core::retry::RetryPolicy;
//!
//! # fn example() -> sumo_export::domain::Result<()> {
//! let config = ExporterConfig::default();
//! let transport = HttpTransport::new(
//!     Credentials::new("access-id", "access-key"),
//!     Session::load(".sumocookie"),
//!     Duration::from_secs(config.api.timeout_seconds),
//! )?;
//! let (_tx, shutdown) = tokio::sync::watch::channel(false);
//! let client = JobClient::new(
//!     Arc::new(transport),
//!     SearchSettings::from_config(&config.api, &config.search),
//!     RetryPolicy::from_config(&config.api.retry),
//!     shutdown,
//! );
//! # Ok(())
//! # }
//! ```

pub mod sumologic;
