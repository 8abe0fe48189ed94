// Test mocks for the ingestion pipeline.
//
// Two mocks matching the two trait boundaries:
// - MockExtractor (PageExtractor): HashMap-based URL to JSON response
// - MockScraper (SocialScraper): HashMap-based query to dataset items
//
// Plus fixture builders for extraction payloads and scraped posts.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use apify_client::{ApifyError, Tweet, TweetAuthor};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use firecrawl_client::FirecrawlError;
use serde_json::{json, Value};

use crate::traits::{ExtractionRequest, PageExtractor, ScrapeRun, SearchJob, SocialScraper};

/// Fixed fetch time used across tests: 2025-03-04T12:00:00Z.
pub fn fetched_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap()
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

enum Canned {
    Data(Value),
    Failure(String),
    RateLimited,
}

/// Keyed by request URL. Unregistered URLs fail.
pub struct MockExtractor {
    responses: HashMap<String, Canned>,
    calls: Mutex<Vec<ExtractionRequest>>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_extract(mut self, url: &str, data: Value) -> Self {
        self.responses.insert(url.to_string(), Canned::Data(data));
        self
    }

    pub fn on_failure(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), Canned::Failure(message.to_string()));
        self
    }

    pub fn on_rate_limit(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Canned::RateLimited);
        self
    }

    /// Every request received, in order.
    pub fn calls(&self) -> Vec<ExtractionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }
}

#[async_trait]
impl PageExtractor for MockExtractor {
    async fn extract(&self, request: &ExtractionRequest) -> Result<Value> {
        self.calls.lock().unwrap().push(request.clone());
        match self.responses.get(&request.url) {
            Some(Canned::Data(data)) => Ok(data.clone()),
            Some(Canned::Failure(message)) => {
                Err(FirecrawlError::ExtractFailed(message.clone()).into())
            }
            Some(Canned::RateLimited) => Err(FirecrawlError::RateLimited.into()),
            None => bail!("MockExtractor: no extraction registered for {}", request.url),
        }
    }
}

// ---------------------------------------------------------------------------
// MockScraper
// ---------------------------------------------------------------------------

/// Keyed by the job's query (without the `since:` floor). `fetch_items`
/// returns every registered item regardless of `limit`.
pub struct MockScraper {
    datasets: HashMap<String, Vec<Tweet>>,
    failing_runs: HashSet<String>,
    rate_limited_runs: HashSet<String>,
    failing_fetches: HashSet<String>,
    jobs: Mutex<Vec<SearchJob>>,
}

impl Default for MockScraper {
    fn default() -> Self {
        Self::new()
    }
}

impl MockScraper {
    pub fn new() -> Self {
        Self {
            datasets: HashMap::new(),
            failing_runs: HashSet::new(),
            rate_limited_runs: HashSet::new(),
            failing_fetches: HashSet::new(),
            jobs: Mutex::new(Vec::new()),
        }
    }

    pub fn on_query(mut self, query: &str, items: Vec<Tweet>) -> Self {
        self.datasets.insert(query.to_string(), items);
        self
    }

    pub fn fail_run(mut self, query: &str) -> Self {
        self.failing_runs.insert(query.to_string());
        self
    }

    pub fn rate_limit_run(mut self, query: &str) -> Self {
        self.rate_limited_runs.insert(query.to_string());
        self
    }

    /// The run succeeds but reading its dataset fails.
    pub fn fail_fetch(mut self, query: &str) -> Self {
        self.datasets.entry(query.to_string()).or_default();
        self.failing_fetches.insert(query.to_string());
        self
    }

    /// Every job submitted, in order.
    pub fn jobs(&self) -> Vec<SearchJob> {
        self.jobs.lock().unwrap().clone()
    }
}

#[async_trait]
impl SocialScraper for MockScraper {
    async fn start_search(&self, job: &SearchJob) -> Result<ScrapeRun> {
        self.jobs.lock().unwrap().push(job.clone());
        if self.rate_limited_runs.contains(&job.query) {
            return Err(ApifyError::RateLimited.into());
        }
        if self.failing_runs.contains(&job.query) {
            return Err(ApifyError::RunFailed("FAILED".to_string()).into());
        }
        if !self.datasets.contains_key(&job.query) {
            bail!("MockScraper: no dataset registered for {}", job.query);
        }
        Ok(ScrapeRun {
            run_id: format!("run-{}", job.query),
            dataset_id: job.query.clone(),
        })
    }

    async fn fetch_items(&self, run: &ScrapeRun, _limit: u32) -> Result<Vec<Tweet>> {
        if self.failing_fetches.contains(&run.dataset_id) {
            return Err(ApifyError::Network("dataset request timed out".to_string()).into());
        }
        self.datasets
            .get(&run.dataset_id)
            .cloned()
            .ok_or_else(|| anyhow!("MockScraper: unknown dataset {}", run.dataset_id))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A well-formed post with id, text, url and timestamp.
pub fn tweet(id: &str, text: &str) -> Tweet {
    Tweet {
        id: Some(id.to_string()),
        text: Some(text.to_string()),
        url: Some(format!("https://x.com/someone/status/{id}")),
        created_at: Some("2025-03-04T08:00:00.000Z".to_string()),
        author: Some(TweetAuthor {
            user_name: Some("someone".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// The empty item a free-tier scraper returns in place of real posts.
pub fn placeholder_tweet() -> Tweet {
    Tweet::default()
}

/// Website discovery payload from `(url, title)` pairs.
pub fn article_listing(articles: &[(&str, &str)]) -> Value {
    let articles: Vec<Value> = articles
        .iter()
        .map(|(url, title)| json!({ "url": url, "title": title }))
        .collect();
    json!({ "articles": articles })
}

/// Website detail payload holding one story.
pub fn story_listing(headline: &str, date_posted: &str, content: &str) -> Value {
    json!({
        "stories": [{
            "headline": headline,
            "date_posted": date_posted,
            "content": content,
        }]
    })
}

pub fn newsletter_landing(url: &str, title: &str, date: &str) -> Value {
    json!({ "latestNewsletter": { "url": url, "title": title, "date": date } })
}

pub fn newsletter_issue(title: &str, date_posted: &str, summary: &str, detailed: &str) -> Value {
    json!({
        "title": title,
        "date_posted": date_posted,
        "summary": summary,
        "detailed_description": detailed,
    })
}
