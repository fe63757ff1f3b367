//! Search job client
//!
//! Drives one search job through its lifecycle on top of a [`Transport`]:
//! submit it, wait for it to finish gathering, then stream its messages page
//! by page. Every remote call is wrapped in the injected [`RetryPolicy`].

use super::models::{CreateJobRequest, CreateJobResponse, JobStatusResponse, MessagesResponse};
use super::transport::{ApiRequest, Transport};
use crate::config::{ApiConfig, SearchConfig};
use crate::core::retry::RetryPolicy;
use crate::core::shutdown::ShutdownSignal;
use crate::domain::{
    ApiError, JobState, JobStatus, LogRecord, Result, SearchJob, SumoError, TimeWindow,
};
use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::sync::Arc;

/// Lazy, forward-only sequence of records for one job
pub type RecordStream<'a> = BoxStream<'a, Result<LogRecord>>;

/// Parameters shared by every job the client submits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Search jobs endpoint, without trailing slash
    pub endpoint: String,
    pub query: String,
    pub time_zone: String,
    pub page_size: u64,
}

impl SearchSettings {
    pub fn from_config(api: &ApiConfig, search: &SearchConfig) -> Self {
        Self {
            endpoint: api.endpoint.trim_end_matches('/').to_string(),
            query: search.query.clone(),
            time_zone: search.time_zone.clone(),
            page_size: search.page_size.max(1),
        }
    }
}

/// Client for the asynchronous search job API
pub struct JobClient {
    transport: Arc<dyn Transport>,
    settings: SearchSettings,
    retry: RetryPolicy,
    shutdown: ShutdownSignal,
}

impl JobClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        settings: SearchSettings,
        retry: RetryPolicy,
        shutdown: ShutdownSignal,
    ) -> Self {
        Self {
            transport,
            settings,
            retry,
            shutdown,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Submit a search job covering `window`
    ///
    /// Succeeds only on `202 Accepted` with a job id in the body; anything
    /// else is retried according to the policy.
    pub async fn create_job(&self, window: &TimeWindow) -> Result<SearchJob> {
        let body = serde_json::to_value(CreateJobRequest {
            query: self.settings.query.clone(),
            from: window.api_from(),
            to: window.api_to(),
            time_zone: self.settings.time_zone.clone(),
        })?;
        let endpoint = self.settings.endpoint.as_str();
        let transport = self.transport.as_ref();

        let id = self
            .retry
            .run("create job", &self.shutdown, || {
                let request = ApiRequest::post(endpoint, body.clone());
                async move {
                    let response = transport.request(request).await?;
                    if response.status != 202 {
                        return Err(response.unexpected());
                    }
                    let created: CreateJobResponse = response.json()?;
                    if created.id.is_empty() {
                        return Err(ApiError::InvalidResponse(
                            "job submission returned an empty id".to_string(),
                        ));
                    }
                    Ok(created.id)
                }
            })
            .await?;

        let job = SearchJob {
            url: format!("{endpoint}/{id}"),
            id,
            window: *window,
            submitted_at: Utc::now(),
        };
        tracing::info!(job_id = %job.id, window = %window, "Created search job");
        Ok(job)
    }

    /// Poll the job until the API reports it done gathering results
    pub async fn poll_until_done(&self, job: &SearchJob) -> Result<JobStatus> {
        let url = job.url.as_str();
        let transport = self.transport.as_ref();

        let status = self
            .retry
            .run("poll job", &self.shutdown, || {
                let request = ApiRequest::get(url);
                async move {
                    let response = transport.request(request).await?;
                    if response.status != 200 {
                        return Err(response.unexpected());
                    }
                    let body: JobStatusResponse = response.json()?;
                    let state = JobState::from_api(&body.state);
                    if !state.is_done() {
                        return Err(ApiError::JobNotReady(body.state));
                    }
                    Ok(JobStatus {
                        state,
                        message_count: body.message_count,
                    })
                }
            })
            .await?;

        tracing::debug!(
            job_id = %job.id,
            message_count = status.message_count,
            "Search job finished gathering results"
        );
        Ok(status)
    }

    /// Stream the job's `count` records, one page at a time
    ///
    /// Pages are requested only as the consumer reaches them; a page is fully
    /// fetched (including retries) before any of its records are yielded. A
    /// page the retry policy gives up on yields that error and then ends the
    /// stream; later pages are never requested.
    pub fn fetch_records<'a>(&'a self, job: &'a SearchJob, count: u64) -> RecordStream<'a> {
        let pages = page_plan(count, self.settings.page_size);
        tracing::debug!(job_id = %job.id, count, pages = pages.len(), "Planned result pages");

        // No page is requested after one has failed
        stream::unfold((pages.into_iter(), false), move |(mut pages, failed)| async move {
            if failed {
                return None;
            }
            let (limit, offset) = pages.next()?;
            let page = self.fetch_page(job, limit, offset).await;
            let failed = page.is_err();
            Some((page, (pages, failed)))
        })
        .map_ok(|records| stream::iter(records.into_iter().map(Ok::<_, SumoError>)))
        .try_flatten()
        .boxed()
    }

    async fn fetch_page(&self, job: &SearchJob, limit: u64, offset: u64) -> Result<Vec<LogRecord>> {
        let url = job.messages_url();
        let transport = self.transport.as_ref();

        let records = self
            .retry
            .run("fetch page", &self.shutdown, || {
                let request = ApiRequest::get(url.as_str())
                    .with_query("limit", limit)
                    .with_query("offset", offset);
                async move {
                    let response = transport.request(request).await?;
                    if response.status != 200 {
                        return Err(response.unexpected());
                    }
                    let page: MessagesResponse = response.json()?;
                    Ok(page
                        .messages
                        .into_iter()
                        .map(|message| message.map)
                        .collect::<Vec<_>>())
                }
            })
            .await?;

        tracing::debug!(job_id = %job.id, offset, records = records.len(), "Fetched page");
        Ok(records)
    }
}

/// `(limit, offset)` pairs covering `count` records
pub fn page_plan(count: u64, page_size: u64) -> Vec<(u64, u64)> {
    let page_size = page_size.max(1);
    (0..count.div_ceil(page_size))
        .map(|page| (page_size, page * page_size))
        .collect()
}
