use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Deserialize;

use trendfinder_common::Story;

use crate::error::IngestError;
use crate::extract::{discover_then_detail, iso_timestamp, non_empty, Candidate, ExtractionPlan};
use crate::traits::PageExtractor;

/// Most recent articles taken from one news site per run.
pub const MAX_ARTICLES: usize = 3;

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct ArticleListing {
    /// The most recent articles on the page, newest first
    #[serde(default)]
    articles: Vec<ArticleStub>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct ArticleStub {
    /// Full URL of the article
    #[serde(default)]
    url: Option<String>,
    /// Title of the article
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct StoryListing {
    /// The article as a single story
    #[serde(default)]
    stories: Vec<ExtractedStory>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct ExtractedStory {
    /// Title of the article
    #[serde(default)]
    headline: String,
    /// Publication date, YYYY-MM-DD when possible
    #[serde(default)]
    date_posted: Option<String>,
    /// Brief summary of the article content
    #[serde(default)]
    content: Option<String>,
}

struct WebsitePlan;

impl ExtractionPlan for WebsitePlan {
    type Listing = ArticleListing;
    type Detail = StoryListing;

    const CAP: usize = MAX_ARTICLES;

    fn discovery_prompt(&self, source_url: &str) -> String {
        format!(
            "Extract the URLs and titles of the {MAX_ARTICLES} most recent articles on this page. \
             Return absolute URLs; resolve relative ones against {source_url}."
        )
    }

    fn candidates(&self, listing: ArticleListing) -> Vec<Candidate> {
        listing
            .articles
            .into_iter()
            .filter_map(|a| Some(Candidate::new(non_empty(a.url)?).titled(a.title)))
            .collect()
    }

    fn detail_prompt(&self, candidate: &Candidate) -> String {
        format!(
            "Extract the headline, the publication date (YYYY-MM-DD if possible) and a \
             100-200 word summary of the article at {}. Return it as a single story.",
            candidate.url
        )
    }

    fn build_story(
        &self,
        detail: StoryListing,
        candidate: &Candidate,
        fetched_at: DateTime<Utc>,
    ) -> Option<Story> {
        let extracted = detail.stories.into_iter().next()?;
        let headline = non_empty(Some(extracted.headline)).or_else(|| candidate.title.clone())?;
        let date = non_empty(extracted.date_posted).unwrap_or_else(|| iso_timestamp(fetched_at));

        let story = Story::new(headline, &candidate.url, date);
        Some(match extracted.content {
            Some(content) => story.with_content(content),
            None => story,
        })
    }
}

/// Fetch up to [`MAX_ARTICLES`] recent articles from a news site.
pub async fn fetch_website(
    extractor: &dyn PageExtractor,
    url: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Story>, IngestError> {
    discover_then_detail(&WebsitePlan, extractor, url, fetched_at).await
}
