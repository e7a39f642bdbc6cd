//! articles-rs: article pages for a content-driven website
//!
//! Resolves article slugs against a content store, renders search-engine
//! metadata and formatted article pages (with upcoming-post handling),
//! and serves or pre-renders them.

pub mod article;
pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod metadata;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

use article::ArticleWorkflow;
use content::FsContentStore;

/// The site application
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Content store over the site's content directory
    pub fn store(&self) -> FsContentStore {
        FsContentStore::with_config(&self.content_dir, &self.config)
    }

    /// Article workflow over the site's content store
    pub fn workflow(&self) -> Result<ArticleWorkflow<FsContentStore>> {
        ArticleWorkflow::new(self.store(), self.config.clone())
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<generator::GenerateReport> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
