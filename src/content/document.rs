//! Converted documents and the converter seam

use serde::Serialize;

use super::frontmatter::{parse_yaml_frontmatter, Meta};
use super::markdown::{MarkdownOptions, MarkdownRenderer};
use crate::html::SafeHtml;

/// A markdown document rendered to HTML, with its front-matter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Converted {
    pub content: SafeHtml,
    pub meta: Meta,
}

/// Turns raw document text into a [`Converted`] document.
///
/// Implemented by [`MarkdownRenderer`] and by any `Fn(&str) -> Converted`,
/// so callers can swap in their own pipeline.
pub trait Converter: Send + Sync {
    fn convert(&self, text: &str) -> Converted;
}

impl<F> Converter for F
where
    F: Fn(&str) -> Converted + Send + Sync,
{
    fn convert(&self, text: &str) -> Converted {
        self(text)
    }
}

impl Converter for MarkdownRenderer {
    fn convert(&self, text: &str) -> Converted {
        let fm = parse_yaml_frontmatter(text);
        Converted {
            content: self.render(fm.body),
            meta: fm.meta,
        }
    }
}

/// Split front-matter and render the body with the given extension overrides
pub fn markdown_to_html(text: &str, options: &MarkdownOptions) -> Converted {
    MarkdownRenderer::with_options(options).convert(text)
}
