use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::links::resolve_link;

// --- Sources ---

/// How a source is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// News site landing page; the most recent articles are extracted.
    Website,
    /// Newsletter archive page; only the latest issue is extracted.
    Newsletter,
    /// Recent posts by one X account.
    #[serde(alias = "twitter_user")]
    SocialUser,
    /// Recent X posts matching a search phrase.
    #[serde(alias = "twitter_search")]
    SocialSearch,
}

impl SourceKind {
    /// Web kinds are addressed by URL; social kinds by username or phrase.
    pub fn is_web(&self) -> bool {
        matches!(self, SourceKind::Website | SourceKind::Newsletter)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Website => "website",
            SourceKind::Newsletter => "newsletter",
            SourceKind::SocialUser => "social_user",
            SourceKind::SocialSearch => "social_search",
        };
        f.write_str(s)
    }
}

/// One configured content origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceDescriptor {
    /// URL for web kinds, username or search phrase for social kinds.
    pub identifier: String,
    pub kind: SourceKind,
}

impl SourceDescriptor {
    pub fn new(identifier: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            identifier: identifier.into(),
            kind,
        }
    }

    pub fn website(url: impl Into<String>) -> Self {
        Self::new(url, SourceKind::Website)
    }

    pub fn newsletter(url: impl Into<String>) -> Self {
        Self::new(url, SourceKind::Newsletter)
    }

    pub fn social_user(username: impl Into<String>) -> Self {
        Self::new(username, SourceKind::SocialUser)
    }

    pub fn social_search(term: impl Into<String>) -> Self {
        Self::new(term, SourceKind::SocialSearch)
    }

    /// Base address used to resolve relative links, if this source has one.
    pub fn base_url(&self) -> Option<&str> {
        self.kind.is_web().then_some(self.identifier.as_str())
    }
}

// --- Stories ---

/// The normalized record every source is reduced to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub headline: String,
    pub link: String,
    pub date_posted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Why a story was refused by [`Story::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryRejection {
    #[error("empty headline")]
    EmptyHeadline,
    #[error("empty link")]
    EmptyLink,
    #[error("link is not an absolute URL: {0}")]
    UnresolvableLink(String),
}

impl Story {
    pub fn new(
        headline: impl Into<String>,
        link: impl Into<String>,
        date_posted: impl Into<String>,
    ) -> Self {
        Self {
            headline: headline.into(),
            link: link.into(),
            date_posted: date_posted.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        let content = content.into();
        self.content = (!content.trim().is_empty()).then_some(content);
        self
    }

    /// Check the record invariants, rewriting a relative link against `base`.
    pub fn normalized(mut self, base: Option<&str>) -> Result<Self, StoryRejection> {
        if self.headline.trim().is_empty() {
            return Err(StoryRejection::EmptyHeadline);
        }
        if self.link.trim().is_empty() {
            return Err(StoryRejection::EmptyLink);
        }
        self.link = resolve_link(base, &self.link)
            .ok_or_else(|| StoryRejection::UnresolvableLink(self.link.clone()))?;
        Ok(self)
    }
}

/// Serialize stories into the single text blob handed to summarization.
pub fn serialize_stories(stories: &[Story]) -> serde_json::Result<String> {
    serde_json::to_string(stories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_parse_from_snake_case_and_legacy_names() {
        let kinds: Vec<SourceKind> = serde_json::from_str(
            r#"["website", "newsletter", "social_user", "twitter_user", "social_search", "twitter_search"]"#,
        )
        .unwrap();
        assert_eq!(
            kinds,
            vec![
                SourceKind::Website,
                SourceKind::Newsletter,
                SourceKind::SocialUser,
                SourceKind::SocialUser,
                SourceKind::SocialSearch,
                SourceKind::SocialSearch,
            ]
        );
    }

    #[test]
    fn only_web_sources_have_a_base_url() {
        assert_eq!(
            SourceDescriptor::website("https://example.com").base_url(),
            Some("https://example.com")
        );
        assert_eq!(SourceDescriptor::social_user("alice").base_url(), None);
    }

    #[test]
    fn content_is_omitted_from_json_when_absent() {
        let story = Story::new("h", "https://x.com/i/status/1", "2025-03-04");
        let json = serde_json::to_value(&story).unwrap();
        assert!(json.get("content").is_none());

        let with = story.with_content("summary");
        let json = serde_json::to_value(&with).unwrap();
        assert_eq!(json["content"], "summary");
    }

    #[test]
    fn blank_content_is_dropped() {
        let story = Story::new("h", "https://a.io", "d").with_content("   ");
        assert!(story.content.is_none());
    }

    #[test]
    fn serialization_round_trips_every_field() {
        let stories = vec![
            Story::new("A", "https://a.io/1", "2025-03-04").with_content("body"),
            Story::new("B", "https://b.io/2", "2025-03-03T10:00:00+00:00"),
        ];
        let blob = serialize_stories(&stories).unwrap();
        let back: Vec<Story> = serde_json::from_str(&blob).unwrap();
        assert_eq!(back, stories);
    }

    #[test]
    fn normalized_resolves_relative_links() {
        let story = Story::new("Headline", "/news/1", "2025-03-04")
            .normalized(Some("https://example.com/blog/"))
            .unwrap();
        assert_eq!(story.link, "https://example.com/news/1");
    }

    #[test]
    fn normalized_rejects_invalid_records() {
        assert_eq!(
            Story::new(" ", "https://a.io", "d").normalized(None),
            Err(StoryRejection::EmptyHeadline)
        );
        assert_eq!(
            Story::new("h", "", "d").normalized(None),
            Err(StoryRejection::EmptyLink)
        );
        assert_eq!(
            Story::new("h", "/relative", "d").normalized(None),
            Err(StoryRejection::UnresolvableLink("/relative".to_string()))
        );
    }
}
