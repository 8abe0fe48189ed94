use apify_client::Tweet;

/// Data quality of a scraper batch. Not an error: a degraded batch still
/// completes, it just carries placeholder items instead of real posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamHealth {
    Normal,
    Degraded,
}

impl UpstreamHealth {
    pub fn is_degraded(&self) -> bool {
        matches!(self, UpstreamHealth::Degraded)
    }
}

/// Inspect the first item of a batch. Placeholder output (free-tier demo data)
/// has no identifier, no URL and no text.
pub fn detect(items: &[Tweet]) -> UpstreamHealth {
    match items.first() {
        Some(first) if is_placeholder(first) => UpstreamHealth::Degraded,
        _ => UpstreamHealth::Normal,
    }
}

fn is_placeholder(item: &Tweet) -> bool {
    is_blank(&item.id) && is_blank(&item.url) && item.content().is_none()
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
