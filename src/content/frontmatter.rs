//! Front-matter parsing

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter parse failures
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unterminated JSON front-matter")]
    UnterminatedJson,
}

/// Front-matter data from an article
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    /// Articles are published unless marked otherwise
    #[serde(default = "default_published")]
    pub published: bool,
}

fn default_published() -> bool {
    true
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            excerpt: None,
            tags: Vec::new(),
            published: true,
        }
    }
}

type ParseResult<'a> = Result<(FrontMatter, &'a str), FrontMatterError>;

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> ParseResult<'_> {
        let content = content.trim_start();

        // YAML front-matter (---)
        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        // JSON front-matter (;;; or {"key":)
        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    fn parse_yaml(content: &str) -> ParseResult<'_> {
        // Find the closing ---
        let rest = &content[3..]; // Skip opening ---
        let rest = rest.trim_start_matches(['\n', '\r']);

        if let Some(end_pos) = rest.find("\n---") {
            let yaml_content = &rest[..end_pos];
            let remaining = &rest[end_pos + 4..]; // Skip \n---
            let remaining = remaining.trim_start_matches(['\n', '\r']);

            // If YAML content is empty or whitespace-only, return default
            if yaml_content.trim().is_empty() {
                return Ok((FrontMatter::default(), remaining));
            }

            // A fenced block of prose (a Markdown rule) is body, not front-matter
            let has_yaml_structure = yaml_content.lines().any(is_yaml_key_line);

            if !has_yaml_structure {
                return Ok((FrontMatter::default(), content));
            }

            let fm = serde_yaml::from_str::<FrontMatter>(yaml_content)?;
            Ok((fm, remaining))
        } else {
            // No closing ---, treat as no front-matter
            Ok((FrontMatter::default(), content))
        }
    }

    fn parse_json(content: &str) -> ParseResult<'_> {
        // JSON front-matter ends with ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            if let Some(end_pos) = rest.find(";;;") {
                let json_content = &rest[..end_pos];
                let remaining = &rest[end_pos + 3..];
                let remaining = remaining.trim_start_matches(['\n', '\r']);

                let fm: FrontMatter = serde_json::from_str(json_content)?;

                return Ok((fm, remaining));
            }
        }

        // Try parsing as a JSON object at the start
        if content.starts_with('{') {
            // Find matching closing brace
            let mut depth = 0;
            let mut end_pos = 0;
            for (i, c) in content.char_indices() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            end_pos = i + 1;
                            break;
                        }
                    }
                    _ => {}
                }
            }

            if end_pos > 0 {
                let json_content = &content[..end_pos];
                let remaining = &content[end_pos..];
                let remaining = remaining.trim_start_matches(['\n', '\r']);

                let fm: FrontMatter = serde_json::from_str(json_content)?;

                return Ok((fm, remaining));
            }
        }

        Err(FrontMatterError::UnterminatedJson)
    }
}

/// `key: value` or `key:` with a plain identifier key that is not a URL scheme
fn is_yaml_key_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    let Some((key, value)) = trimmed.split_once(':') else {
        return false;
    };
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");
    is_valid_key && (value.is_empty() || value.starts_with(' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2099-01-01
excerpt: A look ahead.
tags:
  - rust
  - web
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2099-01-01"));
        assert_eq!(fm.excerpt.as_deref(), Some("A look ahead."));
        assert_eq!(fm.tags, vec!["rust", "web"]);
        assert!(fm.published);
        assert!(remaining.starts_with("This is the content."));
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test Post", "tags": ["a", "b", "a"]}

This is content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Test Post"));
        assert_eq!(fm.tags, vec!["a", "b", "a"]);
        assert!(remaining.contains("This is content."));
    }

    #[test]
    fn test_parse_fenced_json_frontmatter() {
        let content = ";;;\n{\"title\": \"Fenced\", \"published\": false}\n;;;\nBody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Fenced"));
        assert!(!fm.published);
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let content = "---\ntitle: One\nlayout: post\ncomments: true\n---\nBody\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("One"));
        assert_eq!(remaining, "Body\n");
    }

    #[test]
    fn test_single_string_tag() {
        let content = "---\ntitle: One\ntags: Notes\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["Notes"]);
    }

    #[test]
    fn test_null_tags_are_empty() {
        let content = "---\ntitle: One\ntags:\n---\nBody\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert!(fm.tags.is_empty());
    }

    #[test]
    fn test_malformed_tags_are_rejected() {
        let content = "---\ntitle: One\ntags:\n  - name: nested\n---\nBody\n";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(FrontMatterError::Yaml(_))
        ));
    }

    #[test]
    fn test_unterminated_json() {
        let content = "{\"title\": \"Oops\"";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(FrontMatterError::UnterminatedJson)
        ));
    }

    #[test]
    fn test_markdown_rule_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title, None);
        assert!(remaining.contains("https://example.com"));
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("# Just a heading\n").unwrap();
        assert_eq!(fm.title, None);
        assert_eq!(remaining, "# Just a heading\n");
    }
}
