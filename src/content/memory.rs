//! In-memory content store

use std::collections::HashMap;

use super::{ContentRecord, ContentResult, ContentStore};

/// Content store backed by a map, records listed in insertion order
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    categories: HashMap<String, Vec<ContentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record, replacing any record with the same slug
    pub fn insert(&mut self, category: &str, record: ContentRecord) {
        let records = self.categories.entry(category.to_string()).or_default();
        match records.iter_mut().find(|r| r.slug == record.slug) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Builder form of [`MemoryStore::insert`]
    pub fn with(mut self, category: &str, record: ContentRecord) -> Self {
        self.insert(category, record);
        self
    }
}

impl ContentStore for MemoryStore {
    fn get_content_by_slug(
        &self,
        category: &str,
        slug: &str,
    ) -> ContentResult<Option<ContentRecord>> {
        Ok(self
            .categories
            .get(category)
            .and_then(|records| records.iter().find(|r| r.slug == slug))
            .cloned())
    }

    fn get_all_content_slugs(&self, category: &str) -> ContentResult<Vec<String>> {
        Ok(self
            .categories
            .get(category)
            .map(|records| records.iter().map(|r| r.slug.clone()).collect())
            .unwrap_or_default())
    }
}
