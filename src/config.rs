//! Reader configuration loaded from an optional YAML file.
//!
//! Values resolve in this order: command-line flag (or its environment
//! variable), then the YAML file, then built-in defaults. The API key has no
//! default; [`ReaderConfig::api_key`] fails with [`NewsError::MissingApiKey`]
//! when nothing supplied one.
//!
//! ```yaml
//! api_key: "..."
//! base_url: "https://newsapi.org"
//! country: "us"
//! default_category: "general"
//! categories: [general, business, technology]
//! timeout_secs: 30
//! ```

use crate::cli::Cli;
use crate::error::{NewsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Config file picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "newsdesk.yaml";

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";
pub const DEFAULT_COUNTRY: &str = "us";
pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Headline categories offered by the category selector.
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "general",
    "business",
    "entertainment",
    "health",
    "science",
    "sports",
    "technology",
];

/// Resolved settings for one run.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// NewsAPI key. Never logged.
    pub api_key: Option<String>,
    /// Scheme and host of the news API, without the `/v2` path.
    pub base_url: String,
    /// Two-letter country code for top headlines.
    pub country: String,
    /// Category the list view starts on.
    pub default_category: String,
    pub categories: Vec<String>,
    /// Per-request timeout handed to the HTTP client.
    pub timeout_secs: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            default_category: DEFAULT_CATEGORY.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for ReaderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("country", &self.country)
            .field("default_category", &self.default_category)
            .field("categories", &self.categories)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ReaderConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ReaderConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load settings for this run from the config file and CLI overrides.
    ///
    /// An explicit `--config` path must exist; the default file is optional.
    #[instrument(level = "info", skip_all)]
    pub async fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                let yaml = tokio::fs::read_to_string(path).await?;
                info!(%path, "Loaded config file");
                Self::from_yaml(&yaml)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                let yaml = tokio::fs::read_to_string(DEFAULT_CONFIG_FILE).await?;
                info!(path = DEFAULT_CONFIG_FILE, "Loaded config file");
                Self::from_yaml(&yaml)?
            }
            None => {
                debug!("No config file; using defaults");
                Self::default()
            }
        };
        config.apply_overrides(cli);
        debug!(?config, "Resolved configuration");
        Ok(config)
    }

    /// Let flags and environment variables win over the file.
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(key) = &cli.api_key {
            self.api_key = Some(key.clone());
        }
        if let Some(base_url) = &cli.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(country) = &cli.country {
            self.country = country.clone();
        }
        if self.categories.is_empty() {
            self.categories = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
        }
    }

    /// Category to browse: `name` checked against [`Self::categories`], or
    /// the default category when none was asked for.
    pub fn category(&self, name: Option<&str>) -> Result<String> {
        match name {
            Some(name) => resolve_category(&self.categories, name),
            None => Ok(self.default_category.clone()),
        }
    }

    /// The configured API key, or [`NewsError::MissingApiKey`].
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(NewsError::MissingApiKey)
    }
}

/// Lowercase `name` and accept it only if it is one of `categories`.
pub fn resolve_category(categories: &[String], name: &str) -> Result<String> {
    let name = name.trim().to_lowercase();
    if categories.contains(&name) {
        Ok(name)
    } else {
        Err(NewsError::UnknownCategory {
            name,
            choices: categories.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let config = ReaderConfig::default();
        assert_eq!(config.base_url, "https://newsapi.org");
        assert_eq!(config.country, "us");
        assert_eq!(config.default_category, "general");
        assert_eq!(config.categories.len(), 7);
        assert!(matches!(config.api_key(), Err(NewsError::MissingApiKey)));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ReaderConfig::from_yaml("api_key: abc123\ncountry: gb\n").unwrap();
        assert_eq!(config.api_key().unwrap(), "abc123");
        assert_eq!(config.country, "gb");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = ReaderConfig::from_yaml("timeout_secs: [not, a, number]").unwrap_err();
        assert!(matches!(err, NewsError::Config(_)));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let config = ReaderConfig::from_yaml("api_key: '   '").unwrap();
        assert!(matches!(config.api_key(), Err(NewsError::MissingApiKey)));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut config = ReaderConfig::from_yaml("api_key: from-file\ncountry: gb\n").unwrap();
        let cli = Cli::parse_from([
            "newsdesk",
            "--api-key",
            "from-flag",
            "--base-url",
            "http://localhost:9000",
            "headlines",
        ]);
        config.apply_overrides(&cli);
        assert_eq!(config.api_key().unwrap(), "from-flag");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.country, "gb");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ReaderConfig::from_yaml("api_key: secret-key").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_category_checked_against_list() {
        let config = ReaderConfig::from_yaml("categories: [general, sports]").unwrap();
        assert_eq!(config.category(None).unwrap(), "general");
        assert_eq!(config.category(Some(" Sports ")).unwrap(), "sports");

        let err = config.category(Some("weather")).unwrap_err();
        assert!(matches!(err, NewsError::UnknownCategory { .. }));
        assert_eq!(
            err.to_string(),
            "Unknown category `weather`; choose one of: general, sports"
        );
    }
}
