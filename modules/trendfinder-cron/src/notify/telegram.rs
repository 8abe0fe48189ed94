use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::backend::DraftNotifier;

const BASE_URL: &str = "https://api.telegram.org";

/// Telegram's per-message length limit.
pub const MAX_MESSAGE_CHARS: usize = 4096;

static RE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## (.*)").expect("valid header regex"));

/// Telegram bot delivering plain-text drafts to one chat.
pub struct TelegramBot {
    token: String,
    chat_id: String,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramBot {
    pub fn new(token: String, chat_id: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            token,
            chat_id,
            base_url: BASE_URL.to_string(),
            http,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn send_message(&self, text: &str) -> anyhow::Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.base_url, self.token);
        let payload = json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        let resp = self.http.post(&url).json(&payload).send().await?;
        let status = resp.status();
        let body: TelegramResponse = match resp.json().await {
            Ok(body) => body,
            Err(e) => anyhow::bail!("Telegram returned {status} with unreadable body: {e}"),
        };

        if !status.is_success() || !body.ok {
            let description = body.description.unwrap_or_default();
            warn!(status = %status, description = %description, "Telegram sendMessage failed");
            anyhow::bail!("Telegram returned {status}: {description}");
        }

        Ok(())
    }
}

#[async_trait]
impl DraftNotifier for TelegramBot {
    async fn send_draft(&self, draft: &str) -> anyhow::Result<()> {
        let text = format_for_telegram(draft);
        let chunks = split_message(&text, MAX_MESSAGE_CHARS);
        for chunk in &chunks {
            self.send_message(chunk).await?;
        }
        info!(messages = chunks.len(), chars = text.chars().count(), "Draft sent to Telegram");
        Ok(())
    }
}

/// Rewrite Markdown headers and rules into plain text, since messages are
/// sent without a parse mode.
pub fn format_for_telegram(message: &str) -> String {
    let formatted = RE_HEADER.replace_all(message, "\n ${1} \n");
    formatted.replace("---", &format!("\n{}\n", "⋯".repeat(24)))
}

/// Split `text` into pieces of at most `max_chars` characters, breaking on
/// line boundaries where possible.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max_chars {
            // A single overlong line is cut on char boundaries.
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.trim().is_empty() {
        chunks.push(current);
    }
    chunks
}
