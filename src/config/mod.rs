//! Configuration management for sumo-export.
//!
//! sumo-export runs with sensible defaults and no configuration file at all.
//! An optional TOML file tunes the search, retry and export settings, with:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SUMO_EXPORT_<SECTION>_<KEY>` environment overrides
//! - Validation on load
//!
//! Credentials are kept apart from the configuration in their own file, see
//! [`Credentials`].
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [api]
//! endpoint = "https://api.sumologic.com/api/v1/search/jobs"
//! timeout_seconds = 10
//!
//! [api.retry]
//! max_attempts = 0        # unbounded
//! initial_delay_ms = 1000
//! fatal_statuses = [401, 403]
//!
//! [search]
//! query = "_sourceCategory=prod/web"
//! time_zone = "UTC"
//! page_size = 10000
//!
//! [export]
//! output_dir = "exports"
//! initial_wait_seconds = 60
//! ```

pub mod credentials;
pub mod loader;
pub mod schema;
pub mod secret;

pub use credentials::Credentials;
pub use loader::{expand_home, load_config, load_config_or_default};
pub use schema::{
    ApiConfig, ApplicationConfig, ExportConfig, ExporterConfig, LoggingConfig, RetryConfig,
    SearchConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
