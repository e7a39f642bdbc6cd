//! Content module - article records, content stores and Markdown processing

mod frontmatter;
mod loader;
mod markdown;
mod memory;
mod record;
mod store;

pub use frontmatter::{FrontMatter, FrontMatterError};
pub use loader::FsContentStore;
pub use markdown::MarkdownRenderer;
pub use memory::MemoryStore;
pub use record::{ContentRecord, Markup};
pub use store::{ContentError, ContentResult, ContentStore};
