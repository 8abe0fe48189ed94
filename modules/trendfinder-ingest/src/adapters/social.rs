use apify_client::Tweet;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use trendfinder_common::Story;

use crate::degraded;
use crate::error::IngestError;
use crate::extract::{iso_timestamp, non_empty};
use crate::traits::{SearchJob, SocialScraper};

/// Most posts taken from one social source per run.
pub const MAX_POSTS: usize = 50;

/// Where the diagnostic record points when the scraper returns placeholder data.
pub const DIAGNOSTIC_LINK: &str = "https://apify.com/pricing";

const LANGUAGE: &str = "en";

/// A post search plus the label prefixed onto every headline it produces.
struct SocialQuery {
    label: String,
    query: String,
    window: Duration,
}

impl SocialQuery {
    fn user(username: &str) -> Self {
        let username = username.trim().trim_start_matches('@');
        Self {
            label: format!("{username} on X"),
            query: format!("from:{username}"),
            window: Duration::hours(24),
        }
    }

    fn search(term: &str) -> Self {
        let term = term.trim();
        Self {
            label: format!("{term} trend on X"),
            query: term.to_string(),
            window: Duration::days(7),
        }
    }
}

/// Posts by one account from the last 24 hours.
pub async fn fetch_user_posts(
    scraper: &dyn SocialScraper,
    username: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Story>, IngestError> {
    fetch_posts(scraper, &SocialQuery::user(username), fetched_at).await
}

/// Posts matching a phrase from the last 7 days.
pub async fn fetch_search_posts(
    scraper: &dyn SocialScraper,
    term: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Story>, IngestError> {
    fetch_posts(scraper, &SocialQuery::search(term), fetched_at).await
}

async fn fetch_posts(
    scraper: &dyn SocialScraper,
    query: &SocialQuery,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Story>, IngestError> {
    let window_start = fetched_at - query.window;
    let job = SearchJob {
        query: query.query.clone(),
        since: window_start.date_naive(),
        max_items: MAX_POSTS as u32,
        language: LANGUAGE.to_string(),
    };

    let run = scraper
        .start_search(&job)
        .await
        .map_err(IngestError::from_fetch)?;
    info!(query = %job.search_term(), run_id = %run.run_id, "Scrape run finished");

    let mut items = scraper
        .fetch_items(&run, MAX_POSTS as u32)
        .await
        .map_err(IngestError::from_fetch)?;
    items.truncate(MAX_POSTS);

    Ok(posts_to_stories(&query.label, &items, window_start, fetched_at))
}

fn posts_to_stories(
    label: &str,
    items: &[Tweet],
    window_start: DateTime<Utc>,
    fetched_at: DateTime<Utc>,
) -> Vec<Story> {
    let health = degraded::detect(items);
    if health.is_degraded() {
        warn!(label, "Scraper returned placeholder data");
    }

    let stories: Vec<Story> = items
        .iter()
        .filter_map(|item| post_to_story(label, item, window_start))
        .collect();
    info!(label, found = items.len(), kept = stories.len(), "Filtered posts");

    if stories.is_empty() && health.is_degraded() {
        return vec![diagnostic_story(label, fetched_at)];
    }
    stories
}

fn post_to_story(label: &str, item: &Tweet, window_start: DateTime<Utc>) -> Option<Story> {
    let id = non_empty(item.id.clone())?;
    let text = item.content()?;
    let link = non_empty(item.url.clone()).unwrap_or_else(|| format!("https://x.com/i/status/{id}"));
    let date = non_empty(item.created_at.clone()).unwrap_or_else(|| iso_timestamp(window_start));

    Some(Story::new(format!("[{label}] {text}"), link, date))
}

fn diagnostic_story(label: &str, fetched_at: DateTime<Utc>) -> Story {
    Story::new(
        format!(
            "[{label}] NOTE: the scraper returned placeholder data instead of posts; \
             API access requires a paid Apify plan"
        ),
        DIAGNOSTIC_LINK,
        iso_timestamp(fetched_at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[tokio::test]
    async fn user_search_uses_a_one_day_window() {
        let scraper = MockScraper::new().on_query("from:alice", vec![tweet("1", "gm")]);

        let stories = fetch_user_posts(&scraper, "@alice", fetched_at()).await.unwrap();

        let jobs = scraper.jobs();
        assert_eq!(jobs[0].search_term(), "from:alice since:2025-03-03");
        assert_eq!(jobs[0].max_items, 50);
        assert_eq!(jobs[0].language, "en");
        assert_eq!(stories[0].headline, "[alice on X] gm");
    }

    #[tokio::test]
    async fn phrase_search_uses_a_seven_day_window() {
        let scraper = MockScraper::new().on_query("stablecoin", vec![tweet("1", "USDC supply up")]);

        let stories = fetch_search_posts(&scraper, "stablecoin", fetched_at()).await.unwrap();

        assert_eq!(scraper.jobs()[0].search_term(), "stablecoin since:2025-02-25");
        assert_eq!(stories[0].headline, "[stablecoin trend on X] USDC supply up");
    }

    #[tokio::test]
    async fn links_and_dates_fall_back() {
        let mut bare = tweet("42", "no url or date");
        bare.url = None;
        bare.created_at = None;
        let scraper = MockScraper::new().on_query("from:bob", vec![bare]);

        let stories = fetch_user_posts(&scraper, "bob", fetched_at()).await.unwrap();

        assert_eq!(stories[0].link, "https://x.com/i/status/42");
        assert_eq!(stories[0].date_posted, "2025-03-03T12:00:00.000Z");
    }

    #[tokio::test]
    async fn full_text_is_preferred() {
        let mut item = tweet("7", "short");
        item.full_text = Some("the full thread text".to_string());
        let scraper = MockScraper::new().on_query("from:carol", vec![item]);

        let stories = fetch_user_posts(&scraper, "carol", fetched_at()).await.unwrap();
        assert_eq!(stories[0].headline, "[carol on X] the full thread text");
    }

    #[tokio::test]
    async fn results_are_capped_even_when_the_dataset_overflows() {
        let items: Vec<Tweet> = (0..75).map(|i| tweet(&i.to_string(), "post")).collect();
        let scraper = MockScraper::new().on_query("bitcoin", items);

        let stories = fetch_search_posts(&scraper, "bitcoin", fetched_at()).await.unwrap();
        assert_eq!(stories.len(), MAX_POSTS);
    }

    #[tokio::test]
    async fn placeholder_batch_yields_one_diagnostic() {
        let scraper = MockScraper::new()
            .on_query("from:dave", vec![placeholder_tweet(), placeholder_tweet()]);

        let stories = fetch_user_posts(&scraper, "dave", fetched_at()).await.unwrap();

        assert_eq!(stories.len(), 1);
        assert!(stories[0].headline.starts_with("[dave on X] NOTE: "));
        assert_eq!(stories[0].link, DIAGNOSTIC_LINK);
        assert_eq!(stories[0].date_posted, "2025-03-04T12:00:00.000Z");
    }

    #[tokio::test]
    async fn placeholder_first_item_with_real_posts_adds_no_diagnostic() {
        let scraper = MockScraper::new()
            .on_query("from:dave", vec![placeholder_tweet(), tweet("1", "real")]);

        let stories = fetch_user_posts(&scraper, "dave", fetched_at()).await.unwrap();

        assert_eq!(stories.len(), 1);
        assert_eq!(stories[0].headline, "[dave on X] real");
        assert!(stories.iter().all(|s| s.link != DIAGNOSTIC_LINK));
    }

    #[tokio::test]
    async fn filtered_normal_batch_yields_nothing() {
        let mut no_text = tweet("1", "");
        no_text.full_text = None;
        let scraper = MockScraper::new().on_query("from:erin", vec![no_text]);

        let stories = fetch_user_posts(&scraper, "erin", fetched_at()).await.unwrap();
        assert!(stories.is_empty());
    }

    #[tokio::test]
    async fn scraper_failures_surface_as_errors() {
        let scraper = MockScraper::new().fail_run("from:frank");
        let err = fetch_user_posts(&scraper, "frank", fetched_at()).await.unwrap_err();
        assert!(matches!(err, IngestError::SourceFetch(_)));

        let scraper = MockScraper::new().rate_limit_run("ethereum");
        let err = fetch_search_posts(&scraper, "ethereum", fetched_at()).await.unwrap_err();
        assert!(matches!(err, IngestError::RateLimited));
    }
}
