pub mod adapters;
pub mod boundary;
pub mod degraded;
pub mod error;
pub(crate) mod extract;
pub mod ingestor;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod traits;

#[cfg(test)]
mod ingestor_tests;

pub use boundary::isolate;
pub use degraded::UpstreamHealth;
pub use error::IngestError;
pub use ingestor::Ingestor;
pub use traits::{ExtractionRequest, PageExtractor, ScrapeRun, SearchJob, SocialScraper};
