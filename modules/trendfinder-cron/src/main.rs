use std::path::PathBuf;
use std::sync::Arc;

use ai_client::Claude;
use anyhow::{Context, Result};
use apify_client::ApifyClient;
use clap::Parser;
use firecrawl_client::FirecrawlClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

use trendfinder_common::{load_config, Config, FileConfig};
use trendfinder_cron::{
    notify::{backend::DraftNotifier, stdout::StdoutNotifier, telegram::TelegramBot},
    pipeline::Pipeline,
    sources::{default_sources, usable_sources},
    summarize::ClaudeSummarizer,
};
use trendfinder_ingest::Ingestor;

#[derive(Parser)]
#[command(name = "trendfinder", about = "Collect crypto news and posts into a daily trend digest")]
struct Cli {
    /// Path to a TOML file with the source list; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the draft to stdout instead of sending it to Telegram
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("trendfinder=info".parse()?))
        .init();

    let cli = Cli::parse();
    info!("Trendfinder starting...");

    let config = Config::from_env();
    config.log_redacted();

    let file_config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    let sources = if file_config.sources.is_empty() {
        default_sources(&config)
    } else {
        file_config.sources.clone()
    };
    let sources = usable_sources(sources, &config);

    let mut ingestor = Ingestor::new();
    if let Some(key) = &config.firecrawl_api_key {
        ingestor = ingestor.with_extractor(Arc::new(FirecrawlClient::new(key.clone())));
    }
    if let Some(token) = &config.apify_api_token {
        ingestor = ingestor.with_scraper(Arc::new(ApifyClient::new(token.clone())));
    }

    let api_key = config
        .anthropic_api_key
        .clone()
        .context("ANTHROPIC_API_KEY is required")?;
    let summarizer = ClaudeSummarizer::new(Claude::new(api_key, &config.anthropic_model));

    let notifier: Box<dyn DraftNotifier> = if cli.dry_run {
        info!("Dry run, draft will be printed");
        Box::new(StdoutNotifier)
    } else {
        let token = config
            .telegram_bot_token
            .clone()
            .context("TELEGRAM_BOT_TOKEN is required unless --dry-run is set")?;
        let chat_id = config
            .telegram_chat_id
            .clone()
            .context("TELEGRAM_CHAT_ID is required unless --dry-run is set")?;
        Box::new(TelegramBot::new(token, chat_id))
    };

    let pipeline = Pipeline::new(
        ingestor,
        Box::new(summarizer),
        notifier,
        file_config.digest.title.clone(),
    );
    let report = pipeline.run(&sources).await?;

    info!("Trendfinder complete. {report}");
    Ok(())
}
