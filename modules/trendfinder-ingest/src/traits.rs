// Trait abstractions for the two external fetch services.
//
// PageExtractor: prompt-driven structured extraction from a web page (Firecrawl).
// SocialScraper: asynchronous post search jobs with dataset retrieval (Apify).
//
// The ingestor only ever talks to these traits, so tests swap in the mocks
// from `testing`.

use anyhow::Result;
use apify_client::{ApifyClient, Tweet, TweetSearchInput, TweetSort};
use async_trait::async_trait;
use chrono::NaiveDate;
use firecrawl_client::{ExtractRequest, FirecrawlClient};

// ---------------------------------------------------------------------------
// PageExtractor
// ---------------------------------------------------------------------------

/// One structured extraction against a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub url: String,
    pub prompt: String,
    /// JSON schema the service should shape its answer to.
    pub schema: Option<serde_json::Value>,
}

#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Extract structured JSON from `request.url`.
    async fn extract(&self, request: &ExtractionRequest) -> Result<serde_json::Value>;
}

#[async_trait]
impl PageExtractor for FirecrawlClient {
    async fn extract(&self, request: &ExtractionRequest) -> Result<serde_json::Value> {
        let mut body = ExtractRequest::new(&request.url).prompt(&request.prompt);
        if let Some(schema) = &request.schema {
            body = body.schema(schema.clone());
        }
        Ok(FirecrawlClient::extract(self, &body).await?)
    }
}

// ---------------------------------------------------------------------------
// SocialScraper
// ---------------------------------------------------------------------------

/// A post search submitted to the scraping service. Results come back newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchJob {
    /// Search query, e.g. `from:alice` or a plain phrase.
    pub query: String,
    /// Oldest calendar day to include.
    pub since: NaiveDate,
    pub max_items: u32,
    pub language: String,
}

impl SearchJob {
    /// The query string with its time-window floor applied.
    pub fn search_term(&self) -> String {
        format!("{} since:{}", self.query, self.since.format("%Y-%m-%d"))
    }
}

/// Handle to a finished scrape job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRun {
    pub run_id: String,
    pub dataset_id: String,
}

#[async_trait]
pub trait SocialScraper: Send + Sync {
    /// Start a search job and wait until it has finished.
    async fn start_search(&self, job: &SearchJob) -> Result<ScrapeRun>;

    /// Read up to `limit` items from a finished job's dataset.
    async fn fetch_items(&self, run: &ScrapeRun, limit: u32) -> Result<Vec<Tweet>>;
}

#[async_trait]
impl SocialScraper for ApifyClient {
    async fn start_search(&self, job: &SearchJob) -> Result<ScrapeRun> {
        let input = TweetSearchInput {
            search_terms: vec![job.search_term()],
            max_items: job.max_items,
            tweet_language: job.language.clone(),
            sort: TweetSort::Latest,
        };
        let started = self.start_tweet_search(&input).await?;
        let finished = self.wait_for_run(&started.id).await?;
        Ok(ScrapeRun {
            run_id: finished.id,
            dataset_id: finished.default_dataset_id,
        })
    }

    async fn fetch_items(&self, run: &ScrapeRun, limit: u32) -> Result<Vec<Tweet>> {
        Ok(self
            .get_dataset_items(&run.dataset_id, Some(limit))
            .await?)
    }
}
