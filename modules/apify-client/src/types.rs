use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Input for X/Twitter keyword search via apidojo/tweet-scraper.
///
/// Search terms use X's advanced search syntax, e.g. `from:alice since:2025-03-01`.
#[derive(Debug, Clone, Serialize)]
pub struct TweetSearchInput {
    #[serde(rename = "searchTerms")]
    pub search_terms: Vec<String>,
    #[serde(rename = "maxItems")]
    pub max_items: u32,
    #[serde(rename = "tweetLanguage")]
    pub tweet_language: String,
    pub sort: TweetSort,
}

/// Result ordering accepted by the tweet scraper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TweetSort {
    Latest,
    Top,
}

/// Author info nested inside a Tweet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TweetAuthor {
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    pub name: Option<String>,
}

/// A single tweet from the Apify dataset.
///
/// Every field is optional: accounts without API access receive placeholder
/// items with none of them populated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tweet {
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "full_text", alias = "fullText")]
    pub full_text: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "created_at", alias = "createdAt")]
    pub created_at: Option<String>,
    pub author: Option<TweetAuthor>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<i64>,
    #[serde(rename = "retweetCount")]
    pub retweet_count: Option<i64>,
    #[serde(rename = "replyCount")]
    pub reply_count: Option<i64>,
}

impl Tweet {
    /// Returns whichever text field is populated, preferring `full_text`.
    /// Empty strings count as missing.
    pub fn content(&self) -> Option<&str> {
        self.full_text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.text.as_deref().filter(|t| !t.is_empty()))
    }
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}
