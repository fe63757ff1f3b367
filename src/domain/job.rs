//! Search job handles and status

use super::window::TimeWindow;
use chrono::{DateTime, Utc};
use std::fmt;

/// One log record as returned by the search API
///
/// The shape is owned by the remote schema; records are passed through as-is.
pub type LogRecord = serde_json::Map<String, serde_json::Value>;

/// Handle for a server-side search job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchJob {
    /// Opaque job identifier assigned by the API
    pub id: String,

    /// Absolute URL of the job resource
    pub url: String,

    /// Window the job searches
    pub window: TimeWindow,

    /// When the API accepted the job
    pub submitted_at: DateTime<Utc>,
}

impl SearchJob {
    /// URL of the job's message pages
    pub fn messages_url(&self) -> String {
        format!("{}/messages", self.url)
    }
}

/// Lifecycle state reported by the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Gathering,
    Done,
    Other(String),
}

impl JobState {
    /// Map the API's state string
    pub fn from_api(state: &str) -> Self {
        match state {
            "GATHERING RESULTS" => JobState::Gathering,
            "DONE GATHERING RESULTS" => JobState::Done,
            other => JobState::Other(other.to_string()),
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, JobState::Done)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Gathering => f.write_str("GATHERING RESULTS"),
            JobState::Done => f.write_str("DONE GATHERING RESULTS"),
            JobState::Other(state) => f.write_str(state),
        }
    }
}

/// Snapshot of a job's progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatus {
    pub state: JobState,
    pub message_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_state_from_api() {
        assert_eq!(JobState::from_api("GATHERING RESULTS"), JobState::Gathering);
        assert_eq!(JobState::from_api("DONE GATHERING RESULTS"), JobState::Done);
        assert_eq!(
            JobState::from_api("CANCELLED"),
            JobState::Other("CANCELLED".to_string())
        );
        assert!(JobState::Done.is_done());
        assert!(!JobState::Gathering.is_done());
    }

    #[test]
    fn test_job_state_display_round_trips() {
        for state in ["GATHERING RESULTS", "DONE GATHERING RESULTS", "PAUSED"] {
            assert_eq!(JobState::from_api(state).to_string(), state);
        }
    }
}
