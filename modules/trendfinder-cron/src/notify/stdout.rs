use async_trait::async_trait;

use super::backend::DraftNotifier;

/// Prints the draft instead of sending it. Used for dry runs.
pub struct StdoutNotifier;

#[async_trait]
impl DraftNotifier for StdoutNotifier {
    async fn send_draft(&self, draft: &str) -> anyhow::Result<()> {
        println!("{draft}");
        Ok(())
    }
}
