use std::future::Future;

use tracing::{error, info, warn};

use trendfinder_common::{SourceDescriptor, Story};

use crate::error::IngestError;

/// Run one source's fetch and absorb its failure.
///
/// Errors are logged with the source identifier and kind and the source
/// contributes nothing. Successful output is normalized: relative links are
/// resolved against the source and invalid records are dropped.
pub async fn isolate<F>(source: &SourceDescriptor, operation: F) -> Vec<Story>
where
    F: Future<Output = Result<Vec<Story>, IngestError>>,
{
    match operation.await {
        Ok(stories) => accept(source, stories),
        Err(IngestError::RateLimited) => {
            error!(
                source = %source.identifier,
                kind = %source.kind,
                "Rate limit exceeded, skipping source"
            );
            Vec::new()
        }
        Err(e) => {
            error!(
                source = %source.identifier,
                kind = %source.kind,
                error = %e,
                "Source failed, skipping"
            );
            Vec::new()
        }
    }
}

fn accept(source: &SourceDescriptor, stories: Vec<Story>) -> Vec<Story> {
    let found = stories.len();
    let accepted: Vec<Story> = stories
        .into_iter()
        .filter_map(|story| match story.normalized(source.base_url()) {
            Ok(story) => Some(story),
            Err(reason) => {
                warn!(source = %source.identifier, %reason, "Dropping invalid story");
                None
            }
        })
        .collect();

    info!(
        source = %source.identifier,
        kind = %source.kind,
        found,
        accepted = accepted.len(),
        "Source ingested"
    );
    accepted
}
