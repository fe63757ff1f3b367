//! Shared fixtures for integration tests
//!
//! [`FakeSearchApi`] is a scripted in-memory search service behind the
//! [`Transport`] trait. It records every request so tests can assert on the
//! exact calls the client made.

#![allow(dead_code)]

use async_trait::async_trait;
use futures::TryStreamExt;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use sumo_export::adapters::sumologic::{
    ApiRequest, ApiResponse, HttpMethod, JobClient, RecordStream, SearchSettings, Transport,
};
use sumo_export::core::retry::RetryPolicy;
use sumo_export::core::shutdown::ShutdownSignal;
use sumo_export::core::sink::RecordSink;
use sumo_export::domain::{ApiError, LogRecord, Result, SumoError};
use tokio::sync::watch;

pub const ENDPOINT: &str = "https://api.test/api/v1/search/jobs";

#[derive(Debug, Default)]
struct FakeState {
    create_failures: VecDeque<ApiError>,
    page_failures: VecDeque<ApiError>,
    gathering_polls: u32,
    countless_done: u32,
    counts: VecDeque<u64>,
    jobs: HashMap<String, FakeJob>,
    next_id: u32,
    requests: Vec<ApiRequest>,
}

#[derive(Debug, Clone, Default)]
struct FakeJob {
    count: u64,
    polls: u32,
}

/// Scripted search service
#[derive(Debug, Default)]
pub struct FakeSearchApi {
    state: Mutex<FakeState>,
}

impl FakeSearchApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message counts for the jobs created, in creation order; later jobs get 0
    pub fn with_counts(self, counts: impl IntoIterator<Item = u64>) -> Self {
        self.lock().counts = counts.into_iter().collect();
        self
    }

    /// Fail the next job submissions with these errors
    pub fn with_create_failures(self, errors: impl IntoIterator<Item = ApiError>) -> Self {
        self.lock().create_failures = errors.into_iter().collect();
        self
    }

    /// Fail the next page fetches with these errors
    pub fn with_page_failures(self, errors: impl IntoIterator<Item = ApiError>) -> Self {
        self.lock().page_failures = errors.into_iter().collect();
        self
    }

    /// Report `GATHERING RESULTS` this many times per job before `DONE`
    pub fn with_gathering_polls(self, polls: u32) -> Self {
        self.lock().gathering_polls = polls;
        self
    }

    /// Answer this many `DONE` polls with a body that has no `messageCount`
    pub fn with_countless_done(self, polls: u32) -> Self {
        self.lock().countless_done = polls;
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// `(limit, offset)` of every page request, in order
    pub fn page_requests(&self) -> Vec<(u64, u64)> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.url.ends_with("/messages"))
            .map(|r| {
                (
                    r.query_param("limit").and_then(|v| v.parse().ok()).unwrap_or(0),
                    r.query_param("offset").and_then(|v| v.parse().ok()).unwrap_or(0),
                )
            })
            .collect()
    }

    pub fn create_requests(&self) -> Vec<ApiRequest> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == HttpMethod::Post)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn create(state: &mut FakeState) -> std::result::Result<ApiResponse, ApiError> {
        if let Some(error) = state.create_failures.pop_front() {
            return Err(error);
        }
        state.next_id += 1;
        let id = format!("JOB{}", state.next_id);
        let count = state.counts.pop_front().unwrap_or(0);
        state.jobs.insert(id.clone(), FakeJob { count, polls: 0 });
        Ok(ApiResponse::new(
            202,
            serde_json::json!({ "id": id, "link": { "rel": "self" } }).to_string(),
        ))
    }

    fn status(state: &mut FakeState, id: &str) -> std::result::Result<ApiResponse, ApiError> {
        let gathering_polls = state.gathering_polls;
        let job = state.jobs.get_mut(id).ok_or_else(|| not_found(id))?;
        job.polls += 1;
        let body = if job.polls <= gathering_polls {
            serde_json::json!({ "state": "GATHERING RESULTS", "messageCount": 0 })
        } else if state.countless_done > 0 {
            state.countless_done -= 1;
            serde_json::json!({ "state": "DONE GATHERING RESULTS" })
        } else {
            serde_json::json!({ "state": "DONE GATHERING RESULTS", "messageCount": job.count })
        };
        Ok(ApiResponse::new(200, body.to_string()))
    }

    fn messages(
        state: &mut FakeState,
        id: &str,
        request: &ApiRequest,
    ) -> std::result::Result<ApiResponse, ApiError> {
        if let Some(error) = state.page_failures.pop_front() {
            return Err(error);
        }
        let job = state.jobs.get(id).ok_or_else(|| not_found(id))?;
        let limit: u64 = request
            .query_param("limit")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        let offset: u64 = request
            .query_param("offset")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        let end = (offset + limit).min(job.count);
        let messages: Vec<serde_json::Value> = (offset..end)
            .map(|n| serde_json::json!({ "map": { "_raw": format!("{id} line {n}"), "n": n } }))
            .collect();
        Ok(ApiResponse::new(
            200,
            serde_json::json!({ "fields": [], "messages": messages }).to_string(),
        ))
    }
}

fn not_found(id: &str) -> ApiError {
    ApiError::UnexpectedStatus {
        status: 404,
        body: format!("no job {id}"),
    }
}

#[async_trait]
impl Transport for FakeSearchApi {
    async fn request(&self, request: ApiRequest) -> std::result::Result<ApiResponse, ApiError> {
        let mut state = self.lock();
        state.requests.push(request.clone());

        let path = request
            .url
            .strip_prefix(ENDPOINT)
            .unwrap_or(&request.url)
            .trim_start_matches('/')
            .to_string();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match (request.method, segments.as_slice()) {
            (HttpMethod::Post, []) => Self::create(&mut state),
            (HttpMethod::Get, [id]) => Self::status(&mut state, id),
            (HttpMethod::Get, [id, "messages"]) => Self::messages(&mut state, id, &request),
            _ => Err(ApiError::UnexpectedStatus {
                status: 404,
                body: format!("no route for {}", request.url),
            }),
        }
    }
}

/// Settings pointing at [`ENDPOINT`]
pub fn settings(page_size: u64) -> SearchSettings {
    SearchSettings {
        endpoint: ENDPOINT.to_string(),
        query: "_sourceCategory=prod".to_string(),
        time_zone: "UTC".to_string(),
        page_size,
    }
}

/// Shutdown channel whose sender is kept by the caller
pub fn shutdown_channel() -> (watch::Sender<bool>, ShutdownSignal) {
    watch::channel(false)
}

pub fn client(
    api: &Arc<FakeSearchApi>,
    page_size: u64,
    retry: RetryPolicy,
    shutdown: ShutdownSignal,
) -> JobClient {
    JobClient::new(api.clone(), settings(page_size), retry, shutdown)
}

/// One-second fixed retry, like the production default
pub fn fixed_retry() -> RetryPolicy {
    RetryPolicy::fixed(Duration::from_secs(1))
}

pub fn server_error() -> ApiError {
    ApiError::UnexpectedStatus {
        status: 500,
        body: "internal error".to_string(),
    }
}

pub fn unauthorized() -> ApiError {
    ApiError::UnexpectedStatus {
        status: 401,
        body: "unauthorized".to_string(),
    }
}

/// Sink that keeps every window's records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    windows: Mutex<Vec<(String, Vec<LogRecord>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .map(|(label, _)| label.clone())
            .collect()
    }

    pub fn records(&self, label: &str) -> Option<Vec<LogRecord>> {
        self.windows
            .lock()
            .unwrap()
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, records)| records.clone())
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn write(&self, label: &str, records: RecordStream<'_>) -> Result<u64> {
        let records: Vec<LogRecord> = records.try_collect().await?;
        let written = records.len() as u64;
        self.windows
            .lock()
            .unwrap()
            .push((label.to_string(), records));
        Ok(written)
    }
}

/// Sink whose destination is always broken
#[derive(Debug, Default)]
pub struct BrokenSink;

#[async_trait]
impl RecordSink for BrokenSink {
    async fn write(&self, label: &str, _records: RecordStream<'_>) -> Result<u64> {
        Err(SumoError::Io(format!("disk full writing {label}")))
    }
}
