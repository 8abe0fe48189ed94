use url::Url;

/// Resolve `link` to an absolute http(s) URL.
///
/// Absolute links are returned as given (trimmed). Relative links are joined
/// onto `base`. Returns `None` when neither works.
pub fn resolve_link(base: Option<&str>, link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(link) {
        return is_http(&url).then(|| link.to_string());
    }

    let base = Url::parse(base?.trim()).ok()?;
    let joined = base.join(link).ok()?;
    is_http(&joined).then(|| joined.to_string())
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
}
