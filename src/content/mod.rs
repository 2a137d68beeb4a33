//! Content module - front-matter, markdown rendering and file loading

mod document;
mod frontmatter;
pub mod loader;
mod markdown;

pub use document::{markdown_to_html, Converted, Converter};
pub use frontmatter::{parse_metadata, parse_yaml_frontmatter, Frontmatter, Meta};
pub use loader::{read_markdown_file, read_markdown_files, MarkdownFile};
pub use markdown::{MarkdownOptions, MarkdownRenderer};
