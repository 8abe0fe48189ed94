use apify_client::ApifyError;
use firecrawl_client::FirecrawlError;
use thiserror::Error;
use trendfinder_common::SourceKind;

/// Failures scoped to a single source. None of them escape the ingestor.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("rate limit exceeded")]
    RateLimited,

    #[error("fetch failed: {0:#}")]
    SourceFetch(anyhow::Error),

    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("detail extraction failed for {url}: {reason}")]
    Detail { url: String, reason: String },

    #[error("no collaborator configured for {0} sources")]
    Unconfigured(SourceKind),
}

impl IngestError {
    /// Classify an error coming back from an external fetch service.
    pub fn from_fetch(err: anyhow::Error) -> Self {
        if is_rate_limited(&err) {
            IngestError::RateLimited
        } else {
            IngestError::SourceFetch(err)
        }
    }
}

/// True when the upstream service answered with an explicit rate-limit status.
pub fn is_rate_limited(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<FirecrawlError>(),
        Some(FirecrawlError::RateLimited)
    ) || matches!(err.downcast_ref::<ApifyError>(), Some(ApifyError::RateLimited))
}
