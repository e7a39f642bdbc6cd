//! Create a new article

use anyhow::{bail, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::article::CATEGORY;
use crate::helpers::parse_date_string;
use crate::Site;

/// Options for a new article
#[derive(Debug, Default, Clone)]
pub struct NewArticle<'a> {
    pub title: &'a str,
    pub slug: Option<&'a str>,
    /// Publication date, defaults to today
    pub date: Option<&'a str>,
    pub tags: &'a [String],
}

/// Write an article skeleton and return its path
pub fn create_article(site: &Site, article: &NewArticle<'_>) -> Result<PathBuf> {
    let slug = match article.slug {
        Some(slug) => slug::slugify(slug),
        None => slug::slugify(article.title),
    };
    if slug.is_empty() {
        bail!("Cannot derive a slug from {:?}", article.title);
    }

    let date = match article.date {
        Some(value) => match parse_date_string(value) {
            Some(_) => value.to_string(),
            None => bail!("Unrecognized date: {}", value),
        },
        None => Utc::now().format("%Y-%m-%d").to_string(),
    };

    let target_dir = site.content_dir.join(CATEGORY);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let mut content = format!(
        "---\ntitle: {}\ndate: {}\n",
        serde_json::to_string(article.title)?,
        date
    );
    if !article.tags.is_empty() {
        content.push_str("tags:\n");
        for tag in article.tags {
            content.push_str(&format!("  - {}\n", serde_json::to_string(tag)?));
        }
    }
    content.push_str("---\n\n");

    fs::write(&file_path, content)?;
    tracing::info!("Created article {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::RenderOutcome;
    use tempfile::TempDir;

    #[test]
    fn test_create_article_round_trips_through_store() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let tags = vec!["rust".to_string(), "web: notes".to_string()];

        let path = create_article(
            &site,
            &NewArticle {
                title: "Hello, World: Part 2",
                date: Some("2099-01-01"),
                tags: &tags,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(path, site.content_dir.join("articles/hello-world-part-2.md"));

        let workflow = site.workflow().unwrap();
        match workflow.render_article("hello-world-part-2").unwrap() {
            RenderOutcome::Found(page) => {
                assert_eq!(page.title, "Hello, World: Part 2");
                assert_eq!(page.tags, tags);
                assert!(page.decision.is_future);
            }
            RenderOutcome::NotFound => panic!("new article should resolve"),
        }
    }

    #[test]
    fn test_create_article_rejects_duplicates_and_bad_dates() {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        let first = NewArticle {
            title: "Twice",
            ..Default::default()
        };

        create_article(&site, &first).unwrap();
        assert!(create_article(&site, &first).is_err());

        let bad_date = NewArticle {
            title: "Later",
            date: Some("whenever"),
            ..Default::default()
        };
        assert!(create_article(&site, &bad_date).is_err());

        let custom = NewArticle {
            title: "Ignored",
            slug: Some("My Custom Slug"),
            ..Default::default()
        };
        let path = create_article(&site, &custom).unwrap();
        assert!(path.ends_with("my-custom-slug.md"));
    }
}
