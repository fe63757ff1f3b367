//! Configuration schema types
//!
//! This module defines the configuration structure for sumo-export. Every
//! section is optional in the TOML file; omitted keys take the defaults below.

use serde::{Deserialize, Serialize};

/// Main sumo-export configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Search API connection settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Search job parameters
    #[serde(default)]
    pub search: SearchConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.api.validate()?;
        self.search.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Search API connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Search jobs endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Credential file written by `sumo-export configure`
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// Session cookie file, reused across runs
    #[serde(default = "default_cookie_file")]
    pub cookie_file: String,

    /// Retry configuration
    #[serde(default)]
    pub retry: RetryConfig,
}

impl ApiConfig {
    fn validate(&self) -> Result<(), String> {
        if self.endpoint.is_empty() {
            return Err("api.endpoint cannot be empty".to_string());
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err("api.endpoint must start with http:// or https://".to_string());
        }

        let endpoint = url::Url::parse(&self.endpoint)
            .map_err(|e| format!("api.endpoint '{}' is not a valid URL: {e}", self.endpoint))?;
        if endpoint.query().is_some() {
            return Err("api.endpoint must not carry a query string".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("api.timeout_seconds must be greater than 0".to_string());
        }

        if self.credentials_file.is_empty() {
            return Err("api.credentials_file cannot be empty".to_string());
        }

        self.retry.validate()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout_seconds(),
            credentials_file: default_credentials_file(),
            cookie_file: default_cookie_file(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry configuration
///
/// The defaults retry forever with a fixed one second pause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per call, 0 = unbounded
    #[serde(default)]
    pub max_attempts: u32,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Backoff multiplier, 1.0 keeps the delay fixed
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// HTTP statuses that abort immediately instead of retrying
    #[serde(default = "default_fatal_statuses")]
    pub fatal_statuses: Vec<u16>,
}

impl RetryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.backoff_multiplier < 1.0 {
            return Err(format!(
                "api.retry.backoff_multiplier must be at least 1.0, got {}",
                self.backoff_multiplier
            ));
        }

        if self.max_delay_ms < self.initial_delay_ms {
            return Err(format!(
                "api.retry.max_delay_ms ({}) must not be less than initial_delay_ms ({})",
                self.max_delay_ms, self.initial_delay_ms
            ));
        }

        if let Some(status) = self
            .fatal_statuses
            .iter()
            .find(|s| !(100..=599).contains(*s))
        {
            return Err(format!(
                "api.retry.fatal_statuses contains invalid HTTP status {status}"
            ));
        }

        Ok(())
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            fatal_statuses: default_fatal_statuses(),
        }
    }
}

/// Search job parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Search query submitted for every window
    #[serde(default = "default_query")]
    pub query: String,

    /// Time zone the API uses to interpret `from`/`to`
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl SearchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("search.query cannot be empty".to_string());
        }

        if self.time_zone.trim().is_empty() {
            return Err("search.time_zone cannot be empty".to_string());
        }

        if !(1..=10_000).contains(&self.page_size) {
            return Err(format!(
                "search.page_size must be between 1 and 10000, got {}",
                self.page_size
            ));
        }

        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            time_zone: default_time_zone(),
            page_size: default_page_size(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving one gzip file per window
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Width of each window in days
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Range used when no start date is given
    #[serde(default = "default_range_days")]
    pub default_range_days: u32,

    /// Pause between submitting a job and asking for its count
    #[serde(default = "default_initial_wait_seconds")]
    pub initial_wait_seconds: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }

        if self.window_days == 0 {
            return Err("export.window_days must be greater than 0".to_string());
        }

        if self.default_range_days == 0 {
            return Err("export.default_range_days must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            window_days: default_window_days(),
            default_range_days: default_range_days(),
            initial_wait_seconds: default_initial_wait_seconds(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging in addition to the console
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly, never)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err(
                "logging.local_path cannot be empty when local logging is enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_endpoint() -> String {
    "https://api.sumologic.com/api/v1/search/jobs".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_credentials_file() -> String {
    "~/.sumo".to_string()
}

fn default_cookie_file() -> String {
    ".sumocookie".to_string()
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_max_delay_ms() -> u64 {
    60_000
}

fn default_fatal_statuses() -> Vec<u16> {
    vec![401, 403]
}

fn default_query() -> String {
    "*".to_string()
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

fn default_page_size() -> u64 {
    10_000
}

fn default_output_dir() -> String {
    "exports".to_string()
}

fn default_window_days() -> u32 {
    1
}

fn default_range_days() -> u32 {
    30
}

fn default_initial_wait_seconds() -> u64 {
    60
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExporterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.search.page_size, 10_000);
        assert_eq!(config.export.initial_wait_seconds, 60);
        assert_eq!(config.api.retry.max_attempts, 0);
        assert_eq!(config.api.retry.fatal_statuses, vec![401, 403]);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: ExporterConfig = toml::from_str("").unwrap();
        assert_eq!(config.export.output_dir, "exports");
        assert_eq!(config.search.time_zone, "UTC");
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = ExporterConfig::default();
        config.api.endpoint = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_page_size() {
        let mut config = ExporterConfig::default();
        config.search.page_size = 0;
        assert!(config.validate().is_err());
        config.search.page_size = 10_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_retry_config() {
        let mut config = ExporterConfig::default();
        config.api.retry.backoff_multiplier = 0.5;
        assert!(config.validate().is_err());

        let mut config = ExporterConfig::default();
        config.api.retry.max_delay_ms = 10;
        assert!(config.validate().is_err());

        let mut config = ExporterConfig::default();
        config.api.retry.fatal_statuses = vec![401, 42];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_window_days() {
        let mut config = ExporterConfig::default();
        config.export.window_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level_and_rotation() {
        let mut config = ExporterConfig::default();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = ExporterConfig::default();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
