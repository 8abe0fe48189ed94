use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{error, info};

use trendfinder_common::SourceDescriptor;
use trendfinder_ingest::Ingestor;

use crate::draft::{format_draft, ERROR_NOTICE};
use crate::notify::backend::DraftNotifier;
use crate::summarize::Summarizer;

/// One trend-finder run: ingest, summarize, format, deliver.
pub struct Pipeline {
    ingestor: Ingestor,
    summarizer: Box<dyn Summarizer>,
    notifier: Box<dyn DraftNotifier>,
    title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub stories: usize,
    pub trends: usize,
    pub summarized: bool,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stories={}, trends={}, summarized={}",
            self.stories, self.trends, self.summarized
        )
    }
}

impl Pipeline {
    pub fn new(
        ingestor: Ingestor,
        summarizer: Box<dyn Summarizer>,
        notifier: Box<dyn DraftNotifier>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            ingestor,
            summarizer,
            notifier,
            title: title.into(),
        }
    }

    pub async fn run(&self, sources: &[SourceDescriptor]) -> Result<RunReport> {
        self.run_at(sources, Utc::now(), Local::now().date_naive())
            .await
    }

    /// Run with an explicit fetch time and header date. Delivery errors are
    /// returned; summarization errors are delivered as a notice instead.
    pub async fn run_at(
        &self,
        sources: &[SourceDescriptor],
        fetched_at: DateTime<Utc>,
        date: NaiveDate,
    ) -> Result<RunReport> {
        info!(sources = sources.len(), "Starting trend finder run");

        let stories = self.ingestor.ingest_at(sources, fetched_at).await;

        let (draft, trends, summarized) = match self.summarizer.summarize(&stories).await {
            Ok(digest) => (
                format_draft(&digest, &self.title, date),
                digest.trends.len(),
                true,
            ),
            Err(e) => {
                error!(error = %e, "Summarization failed, sending error notice");
                (ERROR_NOTICE.to_string(), 0, false)
            }
        };

        self.notifier.send_draft(&draft).await?;

        let report = RunReport {
            stories: stories.len(),
            trends,
            summarized,
        };
        info!(%report, "Trend finder run complete");
        Ok(report)
    }
}
