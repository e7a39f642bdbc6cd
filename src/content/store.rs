//! Content store interface

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use super::{ContentRecord, FrontMatterError};

/// Failures while reading content. Absence is not one of them.
#[derive(Error, Debug)]
pub enum ContentError {
    /// IO error while reading a content file or directory
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Front-matter could not be parsed
    #[error("Invalid front-matter in {path:?}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    /// Front-matter date in an unknown format
    #[error("Invalid date '{value}' in {path:?}")]
    InvalidDate { path: PathBuf, value: String },

    /// Store backend not reachable
    #[error("Content store unavailable: {0}")]
    Unavailable(String),
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;

/// Lookup and enumeration of content records by category and slug.
///
/// Every slug returned by [`ContentStore::get_all_content_slugs`] must
/// resolve through [`ContentStore::get_content_by_slug`] against the
/// same store state.
pub trait ContentStore: Send + Sync {
    /// Resolve a slug, `Ok(None)` when nothing matches
    fn get_content_by_slug(&self, category: &str, slug: &str)
        -> ContentResult<Option<ContentRecord>>;

    /// All slugs of a category, in listing order
    fn get_all_content_slugs(&self, category: &str) -> ContentResult<Vec<String>>;
}

impl<S: ContentStore + ?Sized> ContentStore for Arc<S> {
    fn get_content_by_slug(
        &self,
        category: &str,
        slug: &str,
    ) -> ContentResult<Option<ContentRecord>> {
        (**self).get_content_by_slug(category, slug)
    }

    fn get_all_content_slugs(&self, category: &str) -> ContentResult<Vec<String>> {
        (**self).get_all_content_slugs(category)
    }
}
