//! Domain error types
//!
//! This module defines the error hierarchy for sumo-export.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main sumo-export error type
///
/// This is the primary error type used throughout the application.
/// Only [`SumoError::InvalidInput`], [`SumoError::Configuration`] and
/// [`SumoError::Fatal`] terminate a run; everything coming back from the
/// search API is retried by the job client first.
#[derive(Debug, Error)]
pub enum SumoError {
    /// Malformed or future-dated range boundary supplied by the operator
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Missing or unreadable credentials, bad configuration file
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A single failed call to the search API
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The API answered with an error that retrying cannot fix
    #[error("{operation} failed permanently: {source}")]
    Fatal {
        operation: String,
        #[source]
        source: ApiError,
    },

    /// The retry policy gave up
    #[error("{operation} gave up after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: ApiError,
    },

    /// A shutdown signal was received while waiting
    #[error("Export interrupted by shutdown signal")]
    Interrupted,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SumoError {
    /// Whether this error should stop the whole run rather than a single window
    pub fn aborts_run(&self) -> bool {
        matches!(
            self,
            SumoError::InvalidInput(_)
                | SumoError::Configuration(_)
                | SumoError::Fatal { .. }
                | SumoError::Interrupted
        )
    }
}

/// Search API errors
///
/// Every failure of a remote call lands here: network faults, unexpected
/// statuses and bodies that don't match the documented shape.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Failed to connect to the API
    #[error("Failed to connect to search API: {0}")]
    ConnectionFailed(String),

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Status code other than the one the call expects
    #[error("Got status {status}, body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Body could not be decoded
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Job exists but is still gathering results
    #[error("Job not ready, state: {0}")]
    JobNotReady(String),
}

impl ApiError {
    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SumoError {
    fn from(err: std::io::Error) -> Self {
        SumoError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SumoError {
    fn from(err: serde_json::Error) -> Self {
        SumoError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SumoError {
    fn from(err: toml::de::Error) -> Self {
        SumoError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sumo_error_display() {
        let err = SumoError::InvalidInput("bad date".to_string());
        assert_eq!(err.to_string(), "Invalid input: bad date");
    }

    #[test]
    fn test_api_error_conversion() {
        let api_err = ApiError::ConnectionFailed("Network error".to_string());
        let err: SumoError = api_err.into();
        assert!(matches!(err, SumoError::Api(_)));
        assert!(!err.aborts_run());
    }

    #[test]
    fn test_unexpected_status_display() {
        let err = ApiError::UnexpectedStatus {
            status: 503,
            body: "busy".to_string(),
        };
        assert_eq!(err.to_string(), "Got status 503, body: busy");
        assert_eq!(err.status(), Some(503));
        assert_eq!(ApiError::Timeout("t".to_string()).status(), None);
    }

    #[test]
    fn test_aborts_run() {
        assert!(SumoError::Configuration("x".to_string()).aborts_run());
        assert!(SumoError::Interrupted.aborts_run());
        assert!(SumoError::Fatal {
            operation: "create job".to_string(),
            source: ApiError::UnexpectedStatus {
                status: 401,
                body: String::new(),
            },
        }
        .aborts_run());
        assert!(!SumoError::RetriesExhausted {
            operation: "poll job".to_string(),
            attempts: 3,
            source: ApiError::Timeout("slow".to_string()),
        }
        .aborts_run());
        assert!(!SumoError::Io("disk full".to_string()).aborts_run());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SumoError = io_err.into();
        assert!(matches!(err, SumoError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: SumoError = toml_err.into();
        assert!(err.to_string().contains("TOML parse error"));
    }
}
