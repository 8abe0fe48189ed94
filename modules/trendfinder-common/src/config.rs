use std::env;

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-7-sonnet-20250219";

/// Secrets and environment-specific values, loaded from the environment
/// (and `.env` when present). The source list lives in the TOML `FileConfig`.
#[derive(Debug, Clone, Default)]
pub struct Config {
    // Extraction
    pub firecrawl_api_key: Option<String>,
    pub apify_api_token: Option<String>,

    // Summarization
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,

    // Delivery
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,

    // Social sources
    pub x_usernames: Vec<String>,
    pub x_search_terms: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            firecrawl_api_key: optional_env("FIRECRAWL_API_KEY"),
            apify_api_token: optional_env("APIFY_API_TOKEN")
                .or_else(|| optional_env("APIFY_API_KEY")),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            anthropic_model: optional_env("ANTHROPIC_MODEL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            telegram_bot_token: optional_env("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: optional_env("TELEGRAM_CHAT_ID"),
            x_usernames: parse_list(&env::var("X_USERNAMES").unwrap_or_default()),
            x_search_terms: parse_list(&env::var("X_SEARCH_TERMS").unwrap_or_default()),
        }
    }

    /// Log which keys are present without revealing them.
    pub fn log_redacted(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  FIRECRAWL_API_KEY: {}", preview_opt(&self.firecrawl_api_key));
        tracing::info!("  APIFY_API_TOKEN: {}", preview_opt(&self.apify_api_token));
        tracing::info!("  ANTHROPIC_API_KEY: {}", preview_opt(&self.anthropic_api_key));
        tracing::info!("  ANTHROPIC_MODEL: {}", self.anthropic_model);
        tracing::info!("  TELEGRAM_BOT_TOKEN: {}", preview_opt(&self.telegram_bot_token));
        tracing::info!("  TELEGRAM_CHAT_ID: {}", preview_opt(&self.telegram_chat_id));
        tracing::info!("  X_USERNAMES: {}", self.x_usernames.len());
        tracing::info!("  X_SEARCH_TERMS: {}", self.x_search_terms.len());
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Split a comma-separated list, trimming entries and dropping empties.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn preview(val: &str) -> String {
    let n = val.chars().count().min(5);
    let head: String = val.chars().take(n).collect();
    format!("{}...({} chars)", head, val.chars().count())
}

fn preview_opt(val: &Option<String>) -> String {
    match val {
        Some(v) if !v.is_empty() => preview(v),
        _ => "<not set>".to_string(),
    }
}
