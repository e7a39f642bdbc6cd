//! Content record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// HTML that was sanitized upstream and is inserted into pages verbatim.
///
/// Templates escape every other value; only `Markup` is emitted raw.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    /// Wrap HTML produced by a trusted pipeline
    pub fn trusted(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One article as returned by a content store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    /// Identifier the record resolves from
    pub slug: String,

    /// Article title
    pub title: String,

    /// Plain-text summary used for metadata
    pub excerpt: String,

    /// Pre-rendered HTML body
    pub content: Markup,

    /// Publication date, possibly in the future
    pub date: DateTime<Utc>,

    /// Tags in authoring order; `None` when the source had none
    pub tags: Option<Vec<String>>,
}

impl ContentRecord {
    /// Create a record with an empty body, excerpt and no tags
    pub fn new(slug: impl Into<String>, title: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            excerpt: String::new(),
            content: Markup::default(),
            date,
            tags: None,
        }
    }

    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    pub fn with_content(mut self, content: Markup) -> Self {
        self.content = content;
        self
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Tags as a slice, empty when absent
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_absent_and_empty_tags() {
        let date = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let record = ContentRecord::new("a", "A", date);
        assert!(record.tags().is_empty());

        let record = record.with_tags(Vec::<String>::new());
        assert_eq!(record.tags, Some(vec![]));
        assert!(record.tags().is_empty());
    }

    #[test]
    fn test_markup_is_verbatim() {
        let markup = Markup::trusted("<p>a &amp; b</p>");
        assert_eq!(markup.to_string(), "<p>a &amp; b</p>");
        assert_eq!(serde_json::to_string(&markup).unwrap(), r#""<p>a &amp; b</p>""#);
    }
}
