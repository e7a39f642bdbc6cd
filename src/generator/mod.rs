//! Generator module - pre-renders article pages into the public directory

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::article::{ArticleWorkflow, RenderOutcome};
use crate::content::ContentStore;
use crate::templates::{TemplateRenderer, STYLESHEET, STYLESHEET_PATH};

/// What a generation run wrote
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub articles: usize,
    pub upcoming: usize,
}

/// Static page generator
pub struct Generator<'a, S> {
    workflow: &'a ArticleWorkflow<S>,
    renderer: TemplateRenderer,
    public_dir: PathBuf,
}

impl<'a, S: ContentStore> Generator<'a, S> {
    /// Create a new generator
    pub fn new(workflow: &'a ArticleWorkflow<S>, public_dir: &Path) -> Result<Self> {
        let renderer = TemplateRenderer::new(workflow.config())?;

        Ok(Self {
            workflow,
            renderer,
            public_dir: public_dir.to_path_buf(),
        })
    }

    /// Generate every known article, the listing, the 404 page and assets
    pub fn generate(&self) -> Result<GenerateReport> {
        fs::create_dir_all(&self.public_dir)?;

        let report = self.generate_article_pages()?;
        self.generate_listing_page()?;
        self.generate_not_found_page()?;
        self.write_file(STYLESHEET_PATH, STYLESHEET)?;

        Ok(report)
    }

    /// Generate one page per known identifier
    fn generate_article_pages(&self) -> Result<GenerateReport> {
        let mut report = GenerateReport::default();

        for slug in self.workflow.list_known_identifiers()? {
            let page = match self.workflow.render_article(&slug)? {
                RenderOutcome::Found(page) => page,
                RenderOutcome::NotFound => {
                    // The store listed a slug it cannot resolve
                    tracing::warn!("Skipping {:?}: listed but not resolvable", slug);
                    continue;
                }
            };

            let html = self.renderer.render_article(&page)?;
            let path = self.workflow.config().article_path(&slug);
            self.write_page(&path, &html)?;

            report.articles += 1;
            if page.decision.is_future {
                report.upcoming += 1;
            }
            tracing::debug!("Generated article: {}", path);
        }

        tracing::info!(
            "Generated {} articles ({} upcoming)",
            report.articles,
            report.upcoming
        );
        Ok(report)
    }

    fn generate_listing_page(&self) -> Result<()> {
        let articles = self.workflow.list_articles()?;
        let html = self
            .renderer
            .render_listing(&self.workflow.listing_metadata(), &articles)?;
        self.write_page(&self.workflow.config().listing_path(), &html)?;
        tracing::info!("Generated article listing");
        Ok(())
    }

    fn generate_not_found_page(&self) -> Result<()> {
        let html = self
            .renderer
            .render_not_found(&self.workflow.not_found_metadata())?;
        self.write_file("404.html", &html)
    }

    /// Write `<public>/<path>/index.html`
    fn write_page(&self, path: &str, html: &str) -> Result<()> {
        let path = format!("{}/index.html", decode_path(path).trim_end_matches('/'));
        self.write_file(&path, html)
    }

    fn write_file(&self, path: &str, content: &str) -> Result<()> {
        // Strip leading slash to avoid creating absolute paths
        let output_path = self.public_dir.join(path.trim_start_matches('/'));
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        Ok(())
    }
}

/// Output directories use the decoded slug so a static server maps the URL back to them
fn decode_path(path: &str) -> String {
    percent_encoding::percent_decode_str(path)
        .decode_utf8_lossy()
        .into_owned()
}
