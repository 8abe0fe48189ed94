pub mod error;
pub mod types;

pub use error::{FirecrawlError, Result};
pub use types::{ExtractRequest, ExtractStatus, ExtractStatusResponse};

use std::time::Duration;

use types::StartExtractResponse;

const BASE_URL: &str = "https://api.firecrawl.dev/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for Firecrawl's prompt-driven `/extract` endpoint.
pub struct FirecrawlClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl FirecrawlClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
            poll_interval: Duration::from_secs(2),
            // 5 minutes at 2s intervals
            max_polls: 150,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Start an extract job. Returns the job id.
    pub async fn start_extract(&self, request: &ExtractRequest) -> Result<String> {
        let resp = self
            .client
            .post(format!("{}/extract", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        let started: StartExtractResponse = resp.json().await?;
        if !started.success {
            return Err(FirecrawlError::ExtractFailed(
                started
                    .error
                    .unwrap_or_else(|| "extract request rejected".to_string()),
            ));
        }

        started
            .id
            .ok_or_else(|| FirecrawlError::Parse("No extract job id returned".to_string()))
    }

    /// Fetch the current state of an extract job.
    pub async fn extract_status(&self, job_id: &str) -> Result<ExtractStatusResponse> {
        let resp = self
            .client
            .get(format!("{}/extract/{}", self.base_url, job_id))
            .bearer_auth(&self.api_key)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let resp = check_status(resp).await?;
        Ok(resp.json().await?)
    }

    /// Poll an extract job until it completes and return its data.
    pub async fn wait_for_extract(&self, job_id: &str) -> Result<serde_json::Value> {
        for attempt in 1..=self.max_polls {
            let status = self.extract_status(job_id).await?;
            if !status.success {
                return Err(FirecrawlError::ExtractFailed(
                    status.error.unwrap_or_else(|| "unknown error".to_string()),
                ));
            }

            match status.status {
                Some(ExtractStatus::Completed) => {
                    return status.data.ok_or_else(|| {
                        FirecrawlError::ExtractFailed("completed without data".to_string())
                    });
                }
                Some(ExtractStatus::Failed) | Some(ExtractStatus::Cancelled) => {
                    return Err(FirecrawlError::ExtractFailed(
                        status
                            .error
                            .unwrap_or_else(|| format!("job ended as {:?}", status.status)),
                    ));
                }
                _ => {
                    tracing::debug!(job_id, attempt, "Extract still in progress");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        Err(FirecrawlError::Timeout {
            job_id: job_id.to_string(),
            attempts: self.max_polls,
        })
    }

    /// Run an extraction end-to-end: start the job, poll, return extracted data.
    pub async fn extract(&self, request: &ExtractRequest) -> Result<serde_json::Value> {
        tracing::info!(urls = ?request.urls, "Starting Firecrawl extract");

        let job_id = self.start_extract(request).await?;
        tracing::debug!(job_id = %job_id, "Extract job started, polling for completion");

        let data = self.wait_for_extract(&job_id).await?;
        tracing::debug!(job_id = %job_id, "Extract job completed");

        Ok(data)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(FirecrawlError::RateLimited);
    }
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(FirecrawlError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp)
}
