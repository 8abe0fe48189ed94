use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Deserialize;

use trendfinder_common::Story;

use crate::error::IngestError;
use crate::extract::{discover_then_detail, iso_timestamp, non_empty, Candidate, ExtractionPlan};
use crate::traits::PageExtractor;

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct NewsletterLanding {
    /// The most recent issue listed on the page
    #[serde(rename = "latestNewsletter", default)]
    latest_newsletter: Option<NewsletterPointer>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct NewsletterPointer {
    /// Full URL of the issue
    #[serde(default)]
    url: Option<String>,
    /// Title of the issue
    #[serde(default)]
    title: Option<String>,
    /// Publication date of the issue
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub(crate) struct NewsletterIssue {
    /// Title of the issue
    #[serde(default)]
    title: Option<String>,
    /// Publication date, YYYY-MM-DD when possible
    #[serde(default)]
    date_posted: Option<String>,
    /// Summary of the whole issue (250-350 words)
    #[serde(default)]
    summary: Option<String>,
    /// Description of the first major topic (300-500 words)
    #[serde(default)]
    detailed_description: Option<String>,
}

struct NewsletterPlan;

impl ExtractionPlan for NewsletterPlan {
    type Listing = NewsletterLanding;
    type Detail = NewsletterIssue;

    const CAP: usize = 1;

    fn discovery_prompt(&self, source_url: &str) -> String {
        format!(
            "Extract the URL, title and publication date of the most recent newsletter issue \
             on this page. Return an absolute URL; resolve a relative one against {source_url}."
        )
    }

    fn candidates(&self, landing: NewsletterLanding) -> Vec<Candidate> {
        landing
            .latest_newsletter
            .and_then(|p| {
                let url = non_empty(p.url)?;
                Some(Candidate::new(url).titled(p.title).dated(p.date))
            })
            .into_iter()
            .collect()
    }

    fn detail_prompt(&self, candidate: &Candidate) -> String {
        format!(
            "From the newsletter issue at {}, extract its title, its publication date \
             (YYYY-MM-DD if possible), a 250-350 word summary of the whole issue and a \
             300-500 word description of its first major topic.",
            candidate.url
        )
    }

    fn build_story(
        &self,
        issue: NewsletterIssue,
        candidate: &Candidate,
        fetched_at: DateTime<Utc>,
    ) -> Option<Story> {
        let headline = non_empty(issue.title).or_else(|| candidate.title.clone())?;
        let date = non_empty(issue.date_posted)
            .or_else(|| candidate.date.clone())
            .unwrap_or_else(|| iso_timestamp(fetched_at));

        let story = Story::new(headline, &candidate.url, date);
        // First-topic description, else the issue summary.
        Some(match non_empty(issue.detailed_description).or(non_empty(issue.summary)) {
            Some(content) => story.with_content(content),
            None => story,
        })
    }
}

/// Fetch the latest issue from a newsletter archive page (zero or one story).
pub async fn fetch_newsletter(
    extractor: &dyn PageExtractor,
    url: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Story>, IngestError> {
    discover_then_detail(&NewsletterPlan, extractor, url, fetched_at).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use serde_json::json;

    const ARCHIVE: &str = "https://bitcoinops.org/en/newsletters/";
    const ISSUE: &str = "https://bitcoinops.org/en/newsletters/2025/03/04/";

    #[tokio::test]
    async fn latest_issue_becomes_one_story() {
        let extractor = MockExtractor::new()
            .on_extract(ARCHIVE, newsletter_landing("/en/newsletters/2025/03/04/", "Newsletter #344", "2025-03-04"))
            .on_extract(
                ISSUE,
                newsletter_issue("Bitcoin Optech Newsletter #344", "2025-03-04", "Summary", "Cluster mempool details"),
            );

        let stories = fetch_newsletter(&extractor, ARCHIVE, fetched_at()).await.unwrap();

        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].headline, "Bitcoin Optech Newsletter #344");
        assert_eq!(stories[0].link, ISSUE);
        assert_eq!(stories[0].date_posted, "2025-03-04");
        assert_eq!(stories[0].content.as_deref(), Some("Cluster mempool details"));
    }

    #[tokio::test]
    async fn discovered_title_and_date_fill_gaps() {
        let extractor = MockExtractor::new()
            .on_extract(ARCHIVE, newsletter_landing(ISSUE, "Newsletter #344", "2025-03-04"))
            .on_extract(ISSUE, json!({"summary": "Summary only"}));

        let stories = fetch_newsletter(&extractor, ARCHIVE, fetched_at()).await.unwrap();

        assert_eq!(stories[0].headline, "Newsletter #344");
        assert_eq!(stories[0].date_posted, "2025-03-04");
        assert_eq!(stories[0].content.as_deref(), Some("Summary only"));
    }

    #[tokio::test]
    async fn missing_pointer_yields_discovery_error() {
        let extractor = MockExtractor::new().on_extract(ARCHIVE, json!({}));

        let err = fetch_newsletter(&extractor, ARCHIVE, fetched_at()).await.unwrap_err();
        assert!(matches!(err, IngestError::Discovery(_)));
    }

    #[tokio::test]
    async fn detail_failure_yields_nothing() {
        let extractor = MockExtractor::new()
            .on_extract(ARCHIVE, newsletter_landing(ISSUE, "Newsletter #344", "2025-03-04"))
            .on_failure(ISSUE, "extract job failed");

        let stories = fetch_newsletter(&extractor, ARCHIVE, fetched_at()).await.unwrap();
        assert!(stories.is_empty());
    }
}
