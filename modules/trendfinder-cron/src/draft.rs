use chrono::{Datelike, NaiveDate};

use crate::summarize::TrendDigest;

const TREND_SEPARATOR: &str = "⚡️⚡️⚡️⚡️⚡️⚡️⚡️⚡️⚡️⚡️⚡️⚡️⚡️⚡️⚡️";

/// Sent in place of a digest when summarization fails.
pub const ERROR_NOTICE: &str = "Error generating draft post.";

/// Render the digest as a plain-text post for `date`.
pub fn format_draft(digest: &TrendDigest, title: &str, date: NaiveDate) -> String {
    let mut draft = format!("🚀 {title} for {}/{}\n\n", date.month(), date.day());

    let trends: Vec<_> = digest.trends.iter().filter(|t| !t.items.is_empty()).collect();
    if trends.is_empty() {
        draft.push_str("No notable trends found today.\n");
        return draft;
    }

    for (i, trend) in trends.iter().enumerate() {
        let emoji = trend_emoji(&trend.trend_name);
        draft.push_str(&format!(
            "{emoji} {} {emoji}\n\n",
            trend.trend_name.to_uppercase()
        ));

        for item in &trend.items {
            draft.push_str(&format!(
                "• [{}] {}\n  {}\n\n",
                item.category, item.description, item.story_or_tweet_link
            ));
        }

        if i + 1 < trends.len() {
            draft.push_str(TREND_SEPARATOR);
            draft.push_str("\n\n");
        }
    }

    draft
}

/// Pick an emoji from keywords in the trend name. First match wins.
pub fn trend_emoji(trend_name: &str) -> &'static str {
    const KEYWORDS: &[(&str, &str)] = &[
        ("bitcoin", "₿"),
        ("regulation", "📜"),
        ("tokenization", "🔗"),
        ("stablecoin", "💎"),
        ("blockchain", "⛓️"),
        ("defi", "🏦"),
        ("nft", "🎨"),
        ("gaming", "🎮"),
        ("metaverse", "🌐"),
        ("ai", "🤖"),
        ("newsletter", "📰"),
        ("development", "⚙️"),
        ("security", "🔒"),
        ("exchange", "💱"),
    ];

    let name = trend_name.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map(|(_, emoji)| *emoji)
        .unwrap_or("📈")
}
