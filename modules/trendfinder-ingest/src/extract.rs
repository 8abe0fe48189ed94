// Two-step discover-then-detail extraction shared by the web adapters.
//
// Discovery asks the extractor for a listing on the source page, candidates are
// resolved and capped, then each candidate gets its own detail extraction.
// A failed detail step drops that candidate only.

use ai_client::StructuredOutput;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use trendfinder_common::{resolve_link, Story};

use crate::error::IngestError;
use crate::traits::{ExtractionRequest, PageExtractor};

/// A page found during discovery, waiting for its detail extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    /// Absolute URL of the page.
    pub url: String,
    pub title: Option<String>,
    pub date: Option<String>,
}

impl Candidate {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            date: None,
        }
    }

    pub(crate) fn titled(mut self, title: Option<String>) -> Self {
        self.title = non_empty(title);
        self
    }

    pub(crate) fn dated(mut self, date: Option<String>) -> Self {
        self.date = non_empty(date);
        self
    }

    fn resolved(mut self, source_url: &str) -> Option<Self> {
        self.url = resolve_link(Some(source_url), &self.url)?;
        Some(self)
    }
}

/// What varies between web source kinds: prompts, listing shape, and mapping.
pub(crate) trait ExtractionPlan: Sync {
    type Listing: StructuredOutput;
    type Detail: StructuredOutput;

    /// Maximum number of candidates taken from one listing.
    const CAP: usize;

    fn discovery_prompt(&self, source_url: &str) -> String;

    fn candidates(&self, listing: Self::Listing) -> Vec<Candidate>;

    fn detail_prompt(&self, candidate: &Candidate) -> String;

    /// Map one detail extraction to a story. `None` means nothing usable came back.
    fn build_story(
        &self,
        detail: Self::Detail,
        candidate: &Candidate,
        fetched_at: DateTime<Utc>,
    ) -> Option<Story>;
}

pub(crate) async fn discover_then_detail<P: ExtractionPlan>(
    plan: &P,
    extractor: &dyn PageExtractor,
    source_url: &str,
    fetched_at: DateTime<Utc>,
) -> Result<Vec<Story>, IngestError> {
    let listing: P::Listing = extract_as(extractor, source_url, plan.discovery_prompt(source_url))
        .await
        .map_err(discovery_failed)?;

    let candidates: Vec<Candidate> = plan
        .candidates(listing)
        .into_iter()
        .filter_map(|c| c.resolved(source_url))
        .take(P::CAP)
        .collect();

    if candidates.is_empty() {
        return Err(IngestError::Discovery(
            "listing contained no resolvable URL".to_string(),
        ));
    }
    info!(source = source_url, candidates = candidates.len(), "Discovered candidates");

    let mut stories = Vec::with_capacity(candidates.len());
    for candidate in &candidates {
        match detail(plan, extractor, candidate, fetched_at).await {
            Ok(story) => stories.push(story),
            Err(e) => warn!(source = source_url, error = %e, "Skipping candidate"),
        }
    }

    Ok(stories)
}

fn discovery_failed(err: anyhow::Error) -> IngestError {
    match IngestError::from_fetch(err) {
        IngestError::SourceFetch(e) => IngestError::Discovery(format!("{e:#}")),
        other => other,
    }
}

async fn detail<P: ExtractionPlan>(
    plan: &P,
    extractor: &dyn PageExtractor,
    candidate: &Candidate,
    fetched_at: DateTime<Utc>,
) -> Result<Story, IngestError> {
    let detail: P::Detail = extract_as(extractor, &candidate.url, plan.detail_prompt(candidate))
        .await
        .map_err(|e| IngestError::Detail {
            url: candidate.url.clone(),
            reason: format!("{e:#}"),
        })?;

    plan.build_story(detail, candidate, fetched_at)
        .ok_or_else(|| IngestError::Detail {
            url: candidate.url.clone(),
            reason: "extraction returned no story".to_string(),
        })
}

/// Run one extraction with `T`'s schema and decode the answer into `T`.
pub(crate) async fn extract_as<T: StructuredOutput>(
    extractor: &dyn PageExtractor,
    url: &str,
    prompt: String,
) -> anyhow::Result<T> {
    let request = ExtractionRequest {
        url: url.to_string(),
        prompt,
        schema: Some(T::tool_schema()),
    };
    let data = extractor.extract(&request).await?;
    Ok(serde_json::from_value(data)?)
}

/// Trimmed value, or `None` when blank.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// ISO 8601 timestamp with millisecond precision in UTC.
pub(crate) fn iso_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
