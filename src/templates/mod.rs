//! Built-in page layout
//!
//! Wraps a converted document in a minimal HTML page. Metadata values are
//! escaped; the rendered content is inserted as-is.

use crate::content::Converted;
use crate::html::escape;

/// Page layout with site-wide defaults
#[derive(Debug, Clone)]
pub struct PageLayout {
    site_title: String,
}

impl PageLayout {
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
        }
    }

    /// Render a full HTML page for a document
    pub fn render(&self, doc: &Converted) -> String {
        let title = match doc.meta.get_str("title") {
            Some(title) if title != self.site_title => format!("{} | {}", title, self.site_title),
            _ => self.site_title.clone(),
        };
        let lang = doc.meta.get_str("lang").unwrap_or("en");

        let mut head = format!(
            "<meta charset=\"utf-8\">\n<title>{}</title>",
            escape(&title)
        );
        if let Some(description) = doc.meta.get_str("description") {
            head.push_str(&format!(
                "\n<meta name=\"description\" content=\"{}\">",
                escape(description)
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n{}\n</head>\n<body>\n<article>\n{}\n</article>\n</body>\n</html>\n",
            escape(lang),
            head,
            doc.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{markdown_to_html, MarkdownOptions};

    #[test]
    fn test_render_page() {
        let doc = markdown_to_html(
            "---\ntitle: Tom & Jerry\ndescription: <cats>\n---\n<b>bold</b>",
            &MarkdownOptions::default(),
        );
        let page = PageLayout::new("Site").render(&doc);

        assert!(page.contains("<title>Tom &amp; Jerry | Site</title>"));
        assert!(page.contains(r#"content="&lt;cats&gt;""#));
        assert!(page.contains("<p><b>bold</b></p>"));
        assert!(page.contains(r#"<html lang="en">"#));
    }

    #[test]
    fn test_render_page_without_meta() {
        let doc = markdown_to_html("plain", &MarkdownOptions::default());
        let page = PageLayout::new("Site").render(&doc);
        assert!(page.contains("<title>Site</title>"));
        assert!(!page.contains("description"));
    }
}
