use tracing::{info, warn};

use trendfinder_common::{Config, SourceDescriptor};

const DEFAULT_WEBSITES: &[&str] = &[
    "https://bitcoinmagazine.com/",
    "https://www.ledgerinsights.com/",
    "https://www.theblock.co/",
];

const DEFAULT_NEWSLETTERS: &[&str] = &["https://bitcoinops.org/en/newsletters/"];

/// Built-in source list: the default news sites and newsletters, plus the
/// social accounts and search terms named in the environment.
pub fn default_sources(config: &Config) -> Vec<SourceDescriptor> {
    let websites = DEFAULT_WEBSITES.iter().map(|u| SourceDescriptor::website(*u));
    let newsletters = DEFAULT_NEWSLETTERS
        .iter()
        .map(|u| SourceDescriptor::newsletter(*u));
    let users = config.x_usernames.iter().map(SourceDescriptor::social_user);
    let searches = config
        .x_search_terms
        .iter()
        .map(SourceDescriptor::social_search);

    websites
        .chain(newsletters)
        .chain(users)
        .chain(searches)
        .collect()
}

/// Drop sources whose fetch service has no credentials configured.
pub fn usable_sources(sources: Vec<SourceDescriptor>, config: &Config) -> Vec<SourceDescriptor> {
    let has_extractor = config.firecrawl_api_key.is_some();
    let has_scraper = config.apify_api_token.is_some();

    let usable: Vec<SourceDescriptor> = sources
        .into_iter()
        .filter(|source| {
            let configured = if source.kind.is_web() {
                has_extractor
            } else {
                has_scraper
            };
            if !configured {
                warn!(
                    source = %source.identifier,
                    kind = %source.kind,
                    "No credentials for this source kind, skipping"
                );
            }
            configured
        })
        .collect();

    info!(sources = usable.len(), "Sources selected");
    usable
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendfinder_common::SourceKind;

    fn config(firecrawl: bool, apify: bool) -> Config {
        Config {
            firecrawl_api_key: firecrawl.then(|| "fc-test".to_string()),
            apify_api_token: apify.then(|| "apify-test".to_string()),
            x_usernames: vec!["saylor".to_string()],
            x_search_terms: vec!["stablecoin".to_string(), "rwa".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn defaults_cover_sites_newsletter_and_social() {
        let sources = default_sources(&config(true, true));

        assert_eq!(sources.len(), 7);
        assert_eq!(sources[0], SourceDescriptor::website("https://bitcoinmagazine.com/"));
        assert_eq!(sources[3].kind, SourceKind::Newsletter);
        assert_eq!(sources[4], SourceDescriptor::social_user("saylor"));
        assert_eq!(sources[6], SourceDescriptor::social_search("rwa"));
    }

    #[test]
    fn sources_without_credentials_are_dropped() {
        let all = default_sources(&config(true, false));
        let usable = usable_sources(all, &config(true, false));
        assert_eq!(usable.len(), 4);
        assert!(usable.iter().all(|s| s.kind.is_web()));

        let all = default_sources(&config(false, true));
        let usable = usable_sources(all, &config(false, true));
        assert_eq!(usable.len(), 3);
        assert!(usable.iter().all(|s| !s.kind.is_web()));
    }
}
