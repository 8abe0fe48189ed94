use ai_client::Claude;
use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use trendfinder_common::{serialize_stories, Story};

/// Upper bound on the story blob sent to the model, in bytes.
const MAX_INPUT_BYTES: usize = 400_000;

const SYSTEM_PROMPT: &str = "\
You are given raw crypto and blockchain stories collected from news sites, newsletters and X posts. \
Find the interesting trends, launches and insights among them.

For each story or post you keep, give:
1. story_or_tweet_link: its URL, copied exactly from the input
2. description: one sentence capturing the key point
3. category: a short label such as DeFi, Stablecoins, Bitcoin or Regulation

Keep at least 10 items unless fewer are available. Group related items under a common trend \
and give each trend a short name. Ignore NOTE entries about scraper limits.";

/// Stories clustered into named trends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendDigest {
    pub trends: Vec<Trend>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Trend {
    /// Short name of the trend or theme
    #[serde(rename = "trendName")]
    pub trend_name: String,
    pub items: Vec<TrendItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TrendItem {
    /// URL of the story or post
    pub story_or_tweet_link: String,
    /// One-sentence summary of the key point
    pub description: String,
    /// Category label, e.g. DeFi, Stablecoins, Bitcoin, Regulation
    pub category: String,
}

impl TrendDigest {
    pub fn is_empty(&self) -> bool {
        self.trends.iter().all(|t| t.items.is_empty())
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, stories: &[Story]) -> Result<TrendDigest>;
}

/// Clusters stories with Claude, using tool-use structured output.
pub struct ClaudeSummarizer {
    claude: Claude,
}

impl ClaudeSummarizer {
    pub fn new(claude: Claude) -> Self {
        Self { claude }
    }
}

#[async_trait]
impl Summarizer for ClaudeSummarizer {
    async fn summarize(&self, stories: &[Story]) -> Result<TrendDigest> {
        if stories.is_empty() {
            info!("No stories to summarize, skipping model call");
            return Ok(TrendDigest::default());
        }

        let raw = serialize_stories(stories)?;
        let input = clip_to_bytes(&raw, MAX_INPUT_BYTES);
        if input.len() < raw.len() {
            warn!(bytes = raw.len(), kept = input.len(), "Story blob truncated");
        }

        info!(
            stories = stories.len(),
            chars = input.len(),
            model = self.claude.model(),
            "Generating trend digest"
        );
        let digest: TrendDigest = self
            .claude
            .extract(SYSTEM_PROMPT, format!("Here are the raw stories and posts:\n{input}"))
            .await?;

        info!(trends = digest.trends.len(), "Trend digest generated");
        Ok(digest)
    }
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a character.
fn clip_to_bytes(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = (0..=max_bytes)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    &s[..end]
}
