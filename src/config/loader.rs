//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ExporterConfig;
use crate::domain::errors::SumoError;
use crate::domain::result::Result;
use directories::BaseDirs;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ExporterConfig
/// 4. Applies environment variable overrides (SUMO_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SumoError::Configuration`] if the file is missing, unreadable,
/// references an unset environment variable, or fails validation.
///
/// # Examples
///
/// ```no_run
/// use sumo_export::config::loader::load_config;
///
/// let config = load_config("sumo-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SumoError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SumoError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ExporterConfig = toml::from_str(&contents)
        .map_err(|e| SumoError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config
        .validate()
        .map_err(|e| SumoError::Configuration(format!("Configuration validation failed: {e}")))?;

    Ok(config)
}

/// Loads configuration, falling back to built-in defaults when the file is absent
///
/// Environment overrides and validation still apply to the defaults.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<ExporterConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    let mut config = ExporterConfig::default();
    apply_env_overrides(&mut config);
    config
        .validate()
        .map_err(|e| SumoError::Configuration(format!("Configuration validation failed: {e}")))?;
    Ok(config)
}

/// Expands a leading `~/` to the current user's home directory
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(dirs) = BaseDirs::new() {
            return dirs.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SumoError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SumoError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using SUMO_EXPORT_* prefix
///
/// Environment variables follow the pattern: SUMO_EXPORT_<SECTION>_<KEY>
/// For example: SUMO_EXPORT_API_ENDPOINT, SUMO_EXPORT_SEARCH_QUERY
fn apply_env_overrides(config: &mut ExporterConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("SUMO_EXPORT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // API overrides
    if let Ok(val) = std::env::var("SUMO_EXPORT_API_ENDPOINT") {
        config.api.endpoint = val;
    }
    if let Ok(val) = std::env::var("SUMO_EXPORT_API_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.api.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("SUMO_EXPORT_API_CREDENTIALS_FILE") {
        config.api.credentials_file = val;
    }
    if let Ok(val) = std::env::var("SUMO_EXPORT_API_COOKIE_FILE") {
        config.api.cookie_file = val;
    }
    if let Ok(val) = std::env::var("SUMO_EXPORT_API_RETRY_MAX_ATTEMPTS") {
        if let Ok(attempts) = val.parse() {
            config.api.retry.max_attempts = attempts;
        }
    }
    if let Ok(val) = std::env::var("SUMO_EXPORT_API_RETRY_INITIAL_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.api.retry.initial_delay_ms = delay;
        }
    }

    // Search overrides
    if let Ok(val) = std::env::var("SUMO_EXPORT_SEARCH_QUERY") {
        config.search.query = val;
    }
    if let Ok(val) = std::env::var("SUMO_EXPORT_SEARCH_TIME_ZONE") {
        config.search.time_zone = val;
    }
    if let Ok(val) = std::env::var("SUMO_EXPORT_SEARCH_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.search.page_size = size;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("SUMO_EXPORT_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Ok(val) = std::env::var("SUMO_EXPORT_EXPORT_INITIAL_WAIT_SECONDS") {
        if let Ok(wait) = val.parse() {
            config.export.initial_wait_seconds = wait;
        }
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SUMO_EXPORT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SUMO_EXPORT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
