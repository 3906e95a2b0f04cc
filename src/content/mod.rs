//! Content module - post records, their sources and feed assembly

mod frontmatter;
pub mod loader;
mod post;
pub mod store;

pub use frontmatter::{parse_date_string, FrontmatterParser, Metadata};
pub use post::{PostId, PostRecord, PostSource, MARKDOWN_ID_PREFIX};
pub use store::{FileStorage, LocalPostStore, MemoryStorage, Storage};
