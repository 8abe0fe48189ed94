use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use trendfinder_common::{SourceDescriptor, SourceKind, Story};

use crate::adapters::{newsletter, social, website};
use crate::boundary::isolate;
use crate::error::IngestError;
use crate::traits::{PageExtractor, SocialScraper};

/// Fans a source list out to the per-kind adapters and concatenates their
/// stories in source order. Sources are fetched one at a time.
///
/// Either collaborator may be absent; sources that need a missing one fail
/// inside the isolation boundary like any other source failure.
#[derive(Clone, Default)]
pub struct Ingestor {
    extractor: Option<Arc<dyn PageExtractor>>,
    scraper: Option<Arc<dyn SocialScraper>>,
}

impl Ingestor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn PageExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn with_scraper(mut self, scraper: Arc<dyn SocialScraper>) -> Self {
        self.scraper = Some(scraper);
        self
    }

    /// Ingest every source, stamping fallbacks with the current time.
    pub async fn ingest(&self, sources: &[SourceDescriptor]) -> Vec<Story> {
        self.ingest_at(sources, Utc::now()).await
    }

    /// Ingest every source as of `fetched_at`. Never fails: a broken source
    /// is logged and contributes nothing.
    pub async fn ingest_at(
        &self,
        sources: &[SourceDescriptor],
        fetched_at: DateTime<Utc>,
    ) -> Vec<Story> {
        info!(sources = sources.len(), "Starting ingestion");

        let mut stories = Vec::new();
        for source in sources {
            info!(source = %source.identifier, kind = %source.kind, "Fetching source");
            let found = isolate(source, self.fetch_source(source, fetched_at)).await;
            stories.extend(found);
        }

        info!(total = stories.len(), "Ingestion complete");
        stories
    }

    async fn fetch_source(
        &self,
        source: &SourceDescriptor,
        fetched_at: DateTime<Utc>,
    ) -> Result<Vec<Story>, IngestError> {
        let id = source.identifier.as_str();
        match source.kind {
            SourceKind::Website => {
                website::fetch_website(self.extractor(source.kind)?, id, fetched_at).await
            }
            SourceKind::Newsletter => {
                newsletter::fetch_newsletter(self.extractor(source.kind)?, id, fetched_at).await
            }
            SourceKind::SocialUser => {
                social::fetch_user_posts(self.scraper(source.kind)?, id, fetched_at).await
            }
            SourceKind::SocialSearch => {
                social::fetch_search_posts(self.scraper(source.kind)?, id, fetched_at).await
            }
        }
    }

    fn extractor(&self, kind: SourceKind) -> Result<&dyn PageExtractor, IngestError> {
        self.extractor
            .as_deref()
            .ok_or(IngestError::Unconfigured(kind))
    }

    fn scraper(&self, kind: SourceKind) -> Result<&dyn SocialScraper, IngestError> {
        self.scraper
            .as_deref()
            .ok_or(IngestError::Unconfigured(kind))
    }
}
