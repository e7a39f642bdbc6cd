//! Article resolution and rendering workflow
//!
//! Resolves a slug against a [`ContentStore`], classifies the record as
//! published or upcoming and assembles the page payload the templates
//! render. A slug that does not resolve is a normal outcome
//! ([`RenderOutcome::NotFound`]), not an error; only store failures are.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use std::sync::Arc;

use crate::config::SiteConfig;
use crate::content::{ContentRecord, ContentResult, ContentStore, Markup};
use crate::helpers::{date_iso, is_future, long_date, url_for};
use crate::metadata::{construct_metadata, Metadata, MetadataOptions};

/// Store category holding the articles
pub const CATEGORY: &str = "articles";

pub const NOT_FOUND_TITLE: &str = "Article Not Found";
pub const NOT_FOUND_DESCRIPTION: &str = "The requested article could not be found.";
pub const UPCOMING_BADGE: &str = "UPCOMING";
pub const BACK_LINK_TEXT: &str = "Back to articles";

/// Source of the resolution-time clock reading
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Per-request classification of a lookup result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderDecision {
    pub found: bool,
    pub is_future: bool,
    pub formatted_date: String,
}

/// Date line above the title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleHeader {
    /// Badge shown for upcoming articles
    pub badge: Option<&'static str>,
    pub text: String,
}

/// Footer link back to the listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackLink {
    pub href: String,
    pub text: &'static str,
}

/// Everything the article template needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticlePage {
    pub slug: String,
    pub metadata: Metadata,
    pub decision: RenderDecision,
    pub header: ArticleHeader,
    pub title: String,
    /// Tag badges in authoring order, duplicates kept
    pub tags: Vec<String>,
    pub body: Markup,
    /// Machine-readable publication date
    pub datetime: String,
    pub back_link: BackLink,
}

/// Result of rendering one slug
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Found(Box<ArticlePage>),
    /// The caller renders its standard not-found response and stops
    NotFound,
}

/// One row of the article listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub formatted_date: String,
    pub datetime: String,
    pub is_future: bool,
    pub url: String,
}

/// The article workflow over an injected content store
pub struct ArticleWorkflow<S> {
    store: S,
    config: SiteConfig,
    tz: Tz,
    clock: Arc<dyn Clock>,
}

impl<S: ContentStore> ArticleWorkflow<S> {
    /// Create a workflow reading the wall clock
    pub fn new(store: S, config: SiteConfig) -> Result<Self> {
        config.validate()?;
        let tz = config.tz()?;
        Ok(Self {
            store,
            config,
            tz,
            clock: Arc::new(SystemClock),
        })
    }

    /// Replace the clock used for future-date classification
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Metadata for a slug, degraded to a no-index descriptor when absent
    pub fn resolve_metadata(&self, slug: &str) -> ContentResult<Metadata> {
        let metadata = match self.store.get_content_by_slug(CATEGORY, slug)? {
            Some(record) => self.article_metadata(&record),
            None => self.not_found_metadata(),
        };
        Ok(metadata)
    }

    /// Every slug the site pre-renders
    pub fn list_known_identifiers(&self) -> ContentResult<Vec<String>> {
        self.store.get_all_content_slugs(CATEGORY)
    }

    /// Render a slug against the workflow's clock
    pub fn render_article(&self, slug: &str) -> ContentResult<RenderOutcome> {
        self.render_article_at(slug, self.clock.now())
    }

    /// Render a slug with an explicit resolution time
    pub fn render_article_at(
        &self,
        slug: &str,
        now: DateTime<Utc>,
    ) -> ContentResult<RenderOutcome> {
        let record = self.store.get_content_by_slug(CATEGORY, slug)?;
        let decision = self.decide(record.as_ref(), now);

        let Some(record) = record else {
            tracing::debug!("Article {:?} not found", slug);
            return Ok(RenderOutcome::NotFound);
        };

        let header = if decision.is_future {
            ArticleHeader {
                badge: Some(UPCOMING_BADGE),
                text: format!(
                    "This article will be published on Medium on {}",
                    decision.formatted_date
                ),
            }
        } else {
            ArticleHeader {
                badge: None,
                text: decision.formatted_date.clone(),
            }
        };

        let page = ArticlePage {
            metadata: self.article_metadata(&record),
            header,
            tags: record.tags().to_vec(),
            datetime: date_iso(&record.date),
            back_link: BackLink {
                href: url_for(&self.config, &self.config.listing_path()),
                text: BACK_LINK_TEXT,
            },
            slug: record.slug,
            title: record.title,
            body: record.content,
            decision,
        };

        Ok(RenderOutcome::Found(Box::new(page)))
    }

    /// Classify a lookup result at resolution time `now`
    pub fn decide(&self, record: Option<&ContentRecord>, now: DateTime<Utc>) -> RenderDecision {
        match record {
            Some(record) => RenderDecision {
                found: true,
                is_future: is_future(&record.date, &now),
                formatted_date: self.format_date(&record.date),
            },
            None => RenderDecision {
                found: false,
                is_future: false,
                formatted_date: String::new(),
            },
        }
    }

    /// Long-form date in the site time zone
    pub fn format_date(&self, date: &DateTime<Utc>) -> String {
        long_date(&date.with_timezone(&self.tz))
    }

    /// Metadata for the not-found response
    pub fn not_found_metadata(&self) -> Metadata {
        construct_metadata(
            &self.config,
            MetadataOptions::new(NOT_FOUND_TITLE, NOT_FOUND_DESCRIPTION).no_index(),
        )
    }

    /// Metadata for the listing page
    pub fn listing_metadata(&self) -> Metadata {
        construct_metadata(
            &self.config,
            MetadataOptions::new("Articles", self.config.description.clone())
                .with_path(self.config.listing_path()),
        )
    }

    /// Summaries of every known article, in store listing order
    pub fn list_articles(&self) -> ContentResult<Vec<ArticleSummary>> {
        let now = self.clock.now();
        let mut summaries = Vec::new();

        for slug in self.list_known_identifiers()? {
            let Some(record) = self.store.get_content_by_slug(CATEGORY, &slug)? else {
                tracing::warn!("Listed article {:?} no longer resolves", slug);
                continue;
            };
            summaries.push(ArticleSummary {
                url: url_for(&self.config, &self.config.article_path(&slug)),
                formatted_date: self.format_date(&record.date),
                datetime: date_iso(&record.date),
                is_future: is_future(&record.date, &now),
                slug,
                title: record.title,
                excerpt: record.excerpt,
            });
        }

        Ok(summaries)
    }

    fn article_metadata(&self, record: &ContentRecord) -> Metadata {
        construct_metadata(
            &self.config,
            MetadataOptions::new(record.title.clone(), record.excerpt.clone())
                .with_path(self.config.article_path(&record.slug)),
        )
    }
}
