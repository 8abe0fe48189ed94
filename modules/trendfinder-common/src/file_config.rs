use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::types::SourceDescriptor;

/// TOML-backed configuration loaded from disk.
/// Secrets (API keys, chat ids) stay as env vars.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub sources: Vec<SourceDescriptor>,
    #[serde(default)]
    pub digest: DigestConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DigestConfig {
    /// Header title, followed by the run date.
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

fn default_title() -> String {
    "Crypto & Blockchain Trends".to_string()
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<FileConfig> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceKind;

    #[test]
    fn parses_sources_and_digest() {
        let config = parse_config(
            r#"
            [digest]
            title = "Stablecoin Watch"

            [[sources]]
            identifier = "https://www.theblock.co/"
            kind = "website"

            [[sources]]
            identifier = "https://bitcoinops.org/en/newsletters/"
            kind = "newsletter"

            [[sources]]
            identifier = "stablecoin"
            kind = "twitter_search"
            "#,
        )
        .unwrap();

        assert_eq!(config.digest.title, "Stablecoin Watch");
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.sources[1].kind, SourceKind::Newsletter);
        assert_eq!(config.sources[2], SourceDescriptor::social_search("stablecoin"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.sources.is_empty());
        assert_eq!(config.digest.title, "Crypto & Blockchain Trends");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(parse_config("[[sources]]\nidentifier = \"a\"\nkind = \"website\"\nweight = 2\n").is_err());
        assert!(parse_config("[[sources]]\nidentifier = \"a\"\nkind = \"rss\"\n").is_err());
    }
}
