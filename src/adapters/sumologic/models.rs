//! Search Job API request and response bodies

use crate::domain::LogRecord;
use serde::{Deserialize, Serialize};

/// Body of `POST /search/jobs`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateJobRequest {
    pub query: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

/// `202 Accepted` body of a job submission
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CreateJobResponse {
    pub id: String,
}

/// Body of `GET /search/jobs/{id}`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JobStatusResponse {
    pub state: String,
    #[serde(rename = "messageCount")]
    pub message_count: u64,
}

/// Body of `GET /search/jobs/{id}/messages`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MessagesResponse {
    pub messages: Vec<Message>,
}

/// One message envelope; the record itself is under `map`
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Message {
    pub map: LogRecord,
}
