//! Site configuration (_config.yml)

use anyhow::{anyhow, bail, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    /// IANA time zone used when displaying article dates
    pub timezone: String,
    pub twitter_handle: Option<String>,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    /// URL prefix of the article pages
    pub articles_dir: String,

    // Writing
    pub excerpt_length: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Website".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            timezone: "UTC".to_string(),
            twitter_handle: None,

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            public_dir: "public".to_string(),
            articles_dir: "articles".to_string(),

            excerpt_length: 160,
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the site cannot be built or served with
    pub fn validate(&self) -> Result<()> {
        self.tz()?;

        let dir = self.articles_dir.trim_matches('/');
        if dir.is_empty() {
            bail!("articles_dir must not be empty");
        }
        let bad_segment =
            |s: &str| s.is_empty() || s == "." || s == ".." || s.starts_with([':', '*']);
        if dir.split('/').any(bad_segment) {
            bail!("Invalid articles_dir '{}'", self.articles_dir);
        }

        Ok(())
    }

    /// Resolve the configured time zone (empty means UTC)
    pub fn tz(&self) -> Result<Tz> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(Tz::UTC);
        }
        name.parse::<Tz>()
            .map_err(|e| anyhow!("Unknown timezone '{}': {}", name, e))
    }

    /// Site-relative path of the article listing, e.g. `/articles/`
    pub fn listing_path(&self) -> String {
        format!("/{}/", self.articles_dir.trim_matches('/'))
    }

    /// Site-relative path of a single article, e.g. `/articles/hello-world/`
    pub fn article_path(&self, slug: &str) -> String {
        format!(
            "/{}/{}/",
            self.articles_dir.trim_matches('/'),
            crate::helpers::encode_segment(slug)
        )
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}
