//! Boundary tests for the ingestor: dispatch, isolation and ordering.
//!
//! Each test follows MOCK → INGEST → OUTPUT.

use std::sync::Arc;

use trendfinder_common::SourceDescriptor;

use crate::testing::*;
use crate::Ingestor;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn news_site(base: &str, paths: &[&str]) -> MockExtractor {
    let articles: Vec<(String, String)> = paths
        .iter()
        .map(|p| (format!("{base}{p}"), format!("Title {p}")))
        .collect();
    let pairs: Vec<(&str, &str)> = articles
        .iter()
        .map(|(u, t)| (u.as_str(), t.as_str()))
        .collect();

    let mut extractor = MockExtractor::new().on_extract(base, article_listing(&pairs));
    for (url, title) in &articles {
        extractor = extractor.on_extract(url, story_listing(title, "2025-03-04", "summary"));
    }
    extractor
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_kind_reaches_its_adapter() {
    let extractor = news_site("https://site.example/", &["a"])
        .on_extract(
            "https://letter.example/",
            newsletter_landing("https://letter.example/42", "Issue 42", "2025-03-01"),
        )
        .on_extract(
            "https://letter.example/42",
            newsletter_issue("Issue 42", "2025-03-01", "s", "d"),
        );
    let scraper = MockScraper::new()
        .on_query("from:alice", vec![tweet("1", "gm")])
        .on_query("defi", vec![tweet("2", "yields")]);

    let ingestor = Ingestor::new()
        .with_extractor(Arc::new(extractor))
        .with_scraper(Arc::new(scraper));

    let sources = vec![
        SourceDescriptor::website("https://site.example/"),
        SourceDescriptor::newsletter("https://letter.example/"),
        SourceDescriptor::social_user("alice"),
        SourceDescriptor::social_search("defi"),
    ];
    let stories = ingestor.ingest_at(&sources, fetched_at()).await;

    let headlines: Vec<_> = stories.iter().map(|s| s.headline.as_str()).collect();
    assert_eq!(
        headlines,
        vec!["Title a", "Issue 42", "[alice on X] gm", "[defi trend on X] yields"]
    );
}

#[tokio::test]
async fn missing_collaborators_skip_only_their_sources() {
    let ingestor = Ingestor::new().with_extractor(Arc::new(news_site("https://site.example/", &["a", "b"])));

    let sources = vec![
        SourceDescriptor::social_user("alice"),
        SourceDescriptor::website("https://site.example/"),
    ];
    let stories = ingestor.ingest_at(&sources, fetched_at()).await;

    assert_eq!(stories.len(), 2);
}

#[tokio::test]
async fn no_sources_no_stories() {
    let stories = Ingestor::new().ingest_at(&[], fetched_at()).await;
    assert!(stories.is_empty());
}

// ---------------------------------------------------------------------------
// Isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failing_source_does_not_affect_its_neighbours() {
    let extractor = news_site("https://one.example/", &["a", "b"])
        .on_rate_limit("https://two.example/");
    let scraper = MockScraper::new()
        .fail_fetch("from:bob")
        .on_query("nft", vec![tweet("1", "mint"), tweet("2", "floor")]);

    let ingestor = Ingestor::new()
        .with_extractor(Arc::new(extractor))
        .with_scraper(Arc::new(scraper));

    let sources = vec![
        SourceDescriptor::website("https://one.example/"),
        SourceDescriptor::website("https://two.example/"),
        SourceDescriptor::social_user("bob"),
        SourceDescriptor::social_search("nft"),
    ];
    let stories = ingestor.ingest_at(&sources, fetched_at()).await;

    // 2 from one.example + 0 + 0 + 2 from the nft search
    assert_eq!(stories.len(), 4);
    assert!(stories[..2].iter().all(|s| s.link.starts_with("https://one.example/")));
    assert!(stories[2..].iter().all(|s| s.headline.starts_with("[nft trend on X] ")));
}

#[tokio::test]
async fn sources_are_fetched_in_list_order() {
    let extractor = Arc::new(
        news_site("https://one.example/", &["a"])
            .on_extract("https://two.example/", article_listing(&[("https://two.example/x", "X")]))
            .on_extract("https://two.example/x", story_listing("X", "2025-03-04", "body")),
    );
    let ingestor = Ingestor::new().with_extractor(extractor.clone());

    let sources = vec![
        SourceDescriptor::website("https://two.example/"),
        SourceDescriptor::website("https://one.example/"),
    ];
    ingestor.ingest_at(&sources, fetched_at()).await;

    assert_eq!(
        extractor.requested_urls(),
        vec![
            "https://two.example/",
            "https://two.example/x",
            "https://one.example/",
            "https://one.example/a",
        ]
    );
}
