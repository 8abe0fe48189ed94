use async_trait::async_trait;

/// Where a finished draft is delivered.
#[async_trait]
pub trait DraftNotifier: Send + Sync {
    async fn send_draft(&self, draft: &str) -> anyhow::Result<()>;
}
