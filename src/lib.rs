//! mdfolder: render folders of markdown into HTML pages
//!
//! Documents are GitHub-flavored markdown with optional YAML front-matter.
//! A page at `/foo/` is backed by `foo.md` or `foo/index.md` under the
//! source folder; [`server::MarkdownFolder`] serves that convention and
//! lists every page for pre-rendering.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod html;
pub mod server;
pub mod source;
pub mod templates;

pub use content::{
    markdown_to_html, parse_yaml_frontmatter, read_markdown_file, read_markdown_files, Converted,
    Converter, Frontmatter, MarkdownFile, MarkdownOptions, MarkdownRenderer, Meta,
};
pub use error::{Error, ReadError, Result};
pub use html::SafeHtml;
pub use server::{serve_markdown_folder, FolderOptions, MarkdownFolder};
pub use source::{FsReader, SourceReader};

use std::path::{Path, PathBuf};

/// Configuration file looked up in the base directory
pub const CONFIG_FILE: &str = "mdfolder.yml";

/// A content site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown source directory
    pub source_dir: PathBuf,
    /// Pre-rendered output directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        }
    }

    /// Markdown renderer configured from the site settings
    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::with_options(&self.config.markdown).with_highlight(&self.config.highlight)
    }

    /// Page layout configured from the site settings
    pub fn layout(&self) -> templates::PageLayout {
        templates::PageLayout::new(&self.config.title)
    }

    /// Folder options for the source directory
    pub fn folder_options(&self) -> FolderOptions {
        FolderOptions::new(&self.source_dir).converter(self.renderer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_site_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.source_dir, dir.path().join("data"));
        assert_eq!(site.public_dir, dir.path().join("public"));
    }

    #[test]
    fn test_site_reads_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "source_dir: content\npublic_dir: dist\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.source_dir, dir.path().join("content"));
        assert_eq!(site.public_dir, dir.path().join("dist"));
    }

    #[test]
    fn test_site_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "server: [").unwrap();
        assert!(Site::new(dir.path()).is_err());
    }
}
