//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Every value is HTML-escaped on
//! output except article bodies, which are [`Markup`](crate::content::Markup)
//! and inserted with `| safe`.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::article::{ArticlePage, ArticleSummary};
use crate::config::SiteConfig;
use crate::helpers::{html_escape, url_for};
use crate::metadata::Metadata;

/// Stylesheet shipped with the templates
pub const STYLESHEET: &str = include_str!("site/css/site.css");

/// Site-relative path the stylesheet is published at
pub const STYLESHEET_PATH: &str = "/css/site.css";

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Tera's default escaper also rewrites '/', which mangles URLs
        tera.set_escape_fn(html_escape);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("article.html", include_str!("site/article.html")),
            ("listing.html", include_str!("site/listing.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            (
                "partials/head.html",
                include_str!("site/partials/head.html"),
            ),
        ])?;

        Ok(Self {
            tera,
            site: SiteData::from_config(config),
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Render an article page
    pub fn render_article(&self, page: &ArticlePage) -> Result<String> {
        let mut context = self.base_context(&page.metadata, "article");
        context.insert("published_time", &page.datetime);
        context.insert("page", page);
        self.render("article.html", &context)
    }

    /// Render the article listing
    pub fn render_listing(
        &self,
        metadata: &Metadata,
        articles: &[ArticleSummary],
    ) -> Result<String> {
        let mut context = self.base_context(metadata, "website");
        context.insert("articles", articles);
        self.render("listing.html", &context)
    }

    /// Render the standard not-found page
    pub fn render_not_found(&self, metadata: &Metadata) -> Result<String> {
        let context = self.base_context(metadata, "website");
        self.render("not_found.html", &context)
    }

    fn base_context(&self, metadata: &Metadata, og_type: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("meta", metadata);
        context.insert("og_type", og_type);
        context.insert("published_time", &Option::<String>::None);
        context.insert("version", env!("CARGO_PKG_VERSION"));
        context
    }
}

/// Site-wide values available to every template
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub author: String,
    pub language: String,
    pub listing_url: String,
    pub stylesheet: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            listing_url: url_for(config, &config.listing_path()),
            stylesheet: url_for(config, STYLESHEET_PATH),
        }
    }
}
