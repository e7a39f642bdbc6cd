//! File-system content store - loads articles from `<content_dir>/<category>/<slug>.md`

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{
    ContentError, ContentRecord, ContentResult, ContentStore, FrontMatter, Markup,
    MarkdownRenderer,
};
use crate::config::SiteConfig;
use crate::helpers::{parse_date_string, summarize};

const EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Content store reading Markdown files with front-matter
pub struct FsContentStore {
    root: PathBuf,
    renderer: MarkdownRenderer,
    excerpt_length: usize,
}

impl FsContentStore {
    /// Create a store rooted at `root` with default rendering settings
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let defaults = SiteConfig::default();
        Self {
            root: root.into(),
            renderer: MarkdownRenderer::with_options(&defaults.highlight),
            excerpt_length: defaults.excerpt_length,
        }
    }

    /// Create a store using the site's highlight and excerpt settings
    pub fn with_config<P: Into<PathBuf>>(root: P, config: &SiteConfig) -> Self {
        Self {
            root: root.into(),
            renderer: MarkdownRenderer::with_options(&config.highlight),
            excerpt_length: config.excerpt_length,
        }
    }

    /// Content root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Locate the file backing a slug
    fn find_file(&self, category: &str, slug: &str) -> Option<PathBuf> {
        let dir = self.root.join(category);
        EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file())
    }

    /// Markdown files directly inside a category directory, as (slug, path)
    fn entries(&self, category: &str) -> Vec<(String, PathBuf)> {
        let dir = self.root.join(category);
        if !dir.is_dir() {
            return Vec::new();
        }

        WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_markdown_file(e.path()))
            .filter_map(|e| {
                let slug = e.path().file_stem()?.to_str()?.to_string();
                is_valid_slug(&slug).then(|| (slug, e.into_path()))
            })
            .collect()
    }

    /// Read a file's front-matter and date, `None` when it is unpublished
    fn read_source(&self, path: &Path) -> ContentResult<Option<Source>> {
        let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let (front_matter, body) =
            FrontMatter::parse(&raw).map_err(|source| ContentError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })?;

        if !front_matter.published {
            return Ok(None);
        }

        let date = match front_matter.date.as_deref() {
            Some(value) => parse_date_string(value).ok_or_else(|| ContentError::InvalidDate {
                path: path.to_path_buf(),
                value: value.to_string(),
            })?,
            None => fs::metadata(path)
                .and_then(|m| m.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now()),
        };

        Ok(Some(Source {
            body: body.to_string(),
            front_matter,
            date,
        }))
    }

    /// Load and render a record from a file, `None` when it is unpublished
    fn load_record(&self, path: &Path, slug: &str) -> ContentResult<Option<ContentRecord>> {
        let Some(Source {
            front_matter: fm,
            body,
            date,
        }) = self.read_source(path)?
        else {
            return Ok(None);
        };

        let (excerpt_md, full_md) = MarkdownRenderer::split_excerpt(&body);
        let content_html = self.renderer.render(&full_md);

        let excerpt = match fm.excerpt {
            Some(excerpt) => excerpt,
            None => {
                let source = excerpt_md.as_deref().unwrap_or(full_md.as_str());
                summarize(&MarkdownRenderer::plain_text(source), self.excerpt_length)
            }
        };

        let title = fm
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| slug.to_string());

        let mut record = ContentRecord::new(slug, title, date)
            .with_excerpt(excerpt)
            .with_content(Markup::trusted(content_html));
        if !fm.tags.is_empty() {
            record = record.with_tags(fm.tags);
        }

        Ok(Some(record))
    }
}

/// A published file before its body is rendered
struct Source {
    front_matter: FrontMatter,
    body: String,
    date: DateTime<Utc>,
}

impl ContentStore for FsContentStore {
    fn get_content_by_slug(
        &self,
        category: &str,
        slug: &str,
    ) -> ContentResult<Option<ContentRecord>> {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejected slug {:?}", slug);
            return Ok(None);
        }

        match self.find_file(category, slug) {
            Some(path) => self.load_record(&path, slug),
            None => Ok(None),
        }
    }

    fn get_all_content_slugs(&self, category: &str) -> ContentResult<Vec<String>> {
        let mut seen = HashSet::new();
        let mut dated = Vec::new();

        // Only front-matter is read here, bodies are rendered on lookup
        for (slug, path) in self.entries(category) {
            if !seen.insert(slug.clone()) {
                continue;
            }
            // Listed slugs must resolve, so the file behind the slug is the one lookups read
            let path = self.find_file(category, &slug).unwrap_or(path);
            match self.read_source(&path) {
                Ok(Some(source)) => dated.push((source.date, slug)),
                Ok(None) => tracing::debug!("Skipping unpublished {:?}", path),
                Err(e) => tracing::warn!("Failed to load article {:?}: {}", path, e),
            }
        }

        // Newest first
        dated.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        Ok(dated.into_iter().map(|(_, slug)| slug).collect())
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

/// A slug names exactly one file inside its category directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(['/', '\\'])
        && !slug.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn write_article(dir: &TempDir, name: &str, content: &str) {
        let articles = dir.path().join("articles");
        fs::create_dir_all(&articles).unwrap();
        fs::write(articles.join(name), content).unwrap();
    }

    #[test]
    fn test_load_article() {
        let dir = TempDir::new().unwrap();
        write_article(
            &dir,
            "hello-world.md",
            "---\ntitle: Hello World\ndate: 2099-01-01\ntags: [x, y, x]\n---\nFirst paragraph.\n\n## Section\n",
        );

        let store = FsContentStore::new(dir.path());
        let record = store
            .get_content_by_slug("articles", "hello-world")
            .unwrap()
            .unwrap();

        assert_eq!(record.slug, "hello-world");
        assert_eq!(record.title, "Hello World");
        assert_eq!(record.date, Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(record.tags(), ["x", "y", "x"]);
        assert!(record.content.as_str().contains("<h2>Section</h2>"));
        assert_eq!(record.excerpt, "First paragraph. Section");
    }

    #[test]
    fn test_excerpt_sources() {
        let dir = TempDir::new().unwrap();
        write_article(
            &dir,
            "explicit.md",
            "---\ntitle: A\nexcerpt: Written by hand.\n---\nBody text.\n",
        );
        write_article(
            &dir,
            "marker.md",
            "---\ntitle: B\n---\nTeaser *here*.\n<!-- more -->\nRest of it.\n",
        );

        let store = FsContentStore::new(dir.path());
        let explicit = store.get_content_by_slug("articles", "explicit").unwrap().unwrap();
        assert_eq!(explicit.excerpt, "Written by hand.");

        let marker = store.get_content_by_slug("articles", "marker").unwrap().unwrap();
        assert_eq!(marker.excerpt, "Teaser here.");
        assert!(marker.content.as_str().contains("Rest of it."));
        assert!(!marker.content.as_str().contains("<!-- more -->"));
    }

    #[test]
    fn test_excerpt_is_plain_text() {
        let dir = TempDir::new().unwrap();
        write_article(&dir, "cartoon.md", "---\ntitle: Cartoon\n---\nTom & Jerry say \"hi\".\n");
        write_article(
            &dir,
            "teaser.md",
            "---\ntitle: Teaser\n---\nTom & <em>Jerry</em>\n<!-- more -->\nRest.\n",
        );

        let store = FsContentStore::new(dir.path());
        let cartoon = store.get_content_by_slug("articles", "cartoon").unwrap().unwrap();
        assert_eq!(cartoon.excerpt, "Tom & Jerry say \u{201c}hi\u{201d}.");
        assert!(cartoon.content.as_str().contains("Tom &amp; Jerry"));

        let teaser = store.get_content_by_slug("articles", "teaser").unwrap().unwrap();
        assert_eq!(teaser.excerpt, "Tom & Jerry");
    }

    #[test]
    fn test_excerpt_length_zero() {
        let dir = TempDir::new().unwrap();
        write_article(&dir, "quiet.md", "---\ntitle: Quiet\n---\nSome body text.\n");

        let config = SiteConfig {
            excerpt_length: 0,
            ..Default::default()
        };
        let store = FsContentStore::with_config(dir.path(), &config);
        let record = store.get_content_by_slug("articles", "quiet").unwrap().unwrap();
        assert_eq!(record.excerpt, "");
    }

    #[test]
    fn test_missing_and_invalid_slugs() {
        let dir = TempDir::new().unwrap();
        write_article(&dir, "real.md", "---\ntitle: Real\n---\nBody\n");
        fs::write(dir.path().join("secret.md"), "---\ntitle: Secret\n---\n").unwrap();

        let store = FsContentStore::new(dir.path());
        assert!(store.get_content_by_slug("articles", "missing-post").unwrap().is_none());
        assert!(store.get_content_by_slug("articles", "../secret").unwrap().is_none());
        assert!(store.get_content_by_slug("articles", "").unwrap().is_none());
        assert!(store.get_content_by_slug("notes", "real").unwrap().is_none());
    }

    #[test]
    fn test_title_defaults_to_slug() {
        let dir = TempDir::new().unwrap();
        write_article(&dir, "untitled-note.markdown", "Just text.\n");

        let store = FsContentStore::new(dir.path());
        let record = store
            .get_content_by_slug("articles", "untitled-note")
            .unwrap()
            .unwrap();
        assert_eq!(record.title, "untitled-note");
        assert!(record.tags.is_none());
    }

    #[test]
    fn test_invalid_date_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_article(&dir, "bad.md", "---\ntitle: Bad\ndate: someday\n---\n");

        let store = FsContentStore::new(dir.path());
        assert!(matches!(
            store.get_content_by_slug("articles", "bad"),
            Err(ContentError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_listing_only_contains_resolvable_slugs() {
        let dir = TempDir::new().unwrap();
        write_article(&dir, "old.md", "---\ntitle: Old\ndate: 2020-01-01\n---\n");
        write_article(&dir, "new.md", "---\ntitle: New\ndate: 2099-01-01\n---\n");
        write_article(&dir, "draft.md", "---\ntitle: Draft\npublished: false\n---\n");
        write_article(&dir, "broken.md", "---\ntitle: Broken\ndate: someday\n---\n");
        write_article(&dir, "notes.txt", "not markdown");

        let store = FsContentStore::new(dir.path());
        let slugs = store.get_all_content_slugs("articles").unwrap();
        assert_eq!(slugs, vec!["new", "old"]);

        for slug in &slugs {
            assert!(store.get_content_by_slug("articles", slug).unwrap().is_some());
        }
        assert!(store.get_content_by_slug("articles", "draft").unwrap().is_none());
    }

    #[test]
    fn test_read_source_leaves_body_unrendered() {
        let dir = TempDir::new().unwrap();
        write_article(&dir, "raw.md", "---\ndate: 2021-06-01\n---\n```rust\nfn main() {}\n```\n");

        let store = FsContentStore::new(dir.path());
        let source = store
            .read_source(&dir.path().join("articles/raw.md"))
            .unwrap()
            .unwrap();
        assert_eq!(source.date, Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap());
        assert!(source.body.starts_with("```rust"));
    }

    #[test]
    fn test_md_takes_precedence_over_markdown() {
        let dir = TempDir::new().unwrap();
        write_article(&dir, "twin.md", "---\ntitle: From md\ndate: 2020-01-01\n---\n");
        write_article(
            &dir,
            "twin.markdown",
            "---\ntitle: From markdown\ndate: 2099-01-01\n---\n",
        );
        write_article(&dir, "mid.md", "---\ntitle: Mid\ndate: 2050-01-01\n---\n");

        let store = FsContentStore::new(dir.path());
        // Listed once, and ordered by the file lookups read
        assert_eq!(store.get_all_content_slugs("articles").unwrap(), vec!["mid", "twin"]);

        let record = store.get_content_by_slug("articles", "twin").unwrap().unwrap();
        assert_eq!(record.title, "From md");
    }

    #[test]
    fn test_listing_missing_category() {
        let dir = TempDir::new().unwrap();
        let store = FsContentStore::new(dir.path());
        assert!(store.get_all_content_slugs("articles").unwrap().is_empty());
    }
}
