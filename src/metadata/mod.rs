//! Search-engine metadata for rendered pages

use serde::Serialize;

use crate::config::SiteConfig;
use crate::helpers::full_url_for;

/// Inputs for [`construct_metadata`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataOptions {
    pub title: String,
    pub description: String,
    /// Ask crawlers to skip the page
    pub no_index: bool,
    /// Site-relative path, used for the canonical URL
    pub path: Option<String>,
}

impl MetadataOptions {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn no_index(mut self) -> Self {
        self.no_index = true;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Metadata descriptor consumed by the page head
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Title as given, used for OpenGraph and Twitter cards
    pub title: String,
    /// Document title, suffixed with the site name
    pub page_title: String,
    pub description: String,
    pub no_index: bool,
    pub canonical: Option<String>,
    pub site_name: String,
    pub locale: String,
    pub twitter_handle: Option<String>,
}

impl Metadata {
    /// Value of the robots meta tag, if one is needed
    pub fn robots(&self) -> Option<&'static str> {
        self.no_index.then_some("noindex, nofollow")
    }
}

/// Build page metadata from per-page options and the site configuration
pub fn construct_metadata(config: &SiteConfig, options: MetadataOptions) -> Metadata {
    let page_title = if options.title.is_empty() || options.title == config.title {
        config.title.clone()
    } else {
        format!("{} | {}", options.title, config.title)
    };

    let description = if options.description.is_empty() {
        config.description.clone()
    } else {
        options.description
    };

    Metadata {
        title: options.title,
        page_title,
        description,
        no_index: options.no_index,
        canonical: options.path.map(|p| full_url_for(config, &p)),
        site_name: config.title.clone(),
        locale: config.language.replace('-', "_"),
        twitter_handle: config.twitter_handle.clone(),
    }
}
