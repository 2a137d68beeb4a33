//! Markdown rendering with optional syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::html::{escape, SafeHtml};

/// Overrides for the markdown extension set.
///
/// Unset fields keep the GitHub-flavored defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    pub tables: Option<bool>,
    pub strikethrough: Option<bool>,
    pub tasklists: Option<bool>,
    pub footnotes: Option<bool>,
    /// Bare `https://` and `www.` URLs become links
    pub autolinks: Option<bool>,
    /// GitHub blockquote tags (`> [!NOTE]`)
    pub gfm: Option<bool>,
    pub smart_punctuation: Option<bool>,
    pub heading_attributes: Option<bool>,
    pub definition_list: Option<bool>,
}

impl MarkdownOptions {
    /// Resolve against the GFM defaults into parser flags
    pub fn to_parser_options(&self) -> Options {
        let flags = [
            (self.tables, true, Options::ENABLE_TABLES),
            (self.strikethrough, true, Options::ENABLE_STRIKETHROUGH),
            (self.tasklists, true, Options::ENABLE_TASKLISTS),
            (self.footnotes, true, Options::ENABLE_FOOTNOTES),
            (self.gfm, true, Options::ENABLE_GFM),
            (self.smart_punctuation, false, Options::ENABLE_SMART_PUNCTUATION),
            (self.heading_attributes, false, Options::ENABLE_HEADING_ATTRIBUTES),
            (self.definition_list, false, Options::ENABLE_DEFINITION_LIST),
        ];

        // YAML metadata blocks stay off: front-matter is split before rendering.
        let mut options = Options::empty();
        for (value, default, flag) in flags {
            options.set(flag, value.unwrap_or(default));
        }
        options
    }

    pub fn autolinks_enabled(&self) -> bool {
        self.autolinks.unwrap_or(true)
    }
}

/// Markdown renderer
pub struct MarkdownRenderer {
    options: Options,
    autolinks: bool,
    highlighter: Option<Highlighter>,
}

impl MarkdownRenderer {
    /// Create a renderer with the GFM defaults and no highlighting
    pub fn new() -> Self {
        Self::with_options(&MarkdownOptions::default())
    }

    /// Create with caller overrides on top of the GFM defaults
    pub fn with_options(options: &MarkdownOptions) -> Self {
        Self {
            options: options.to_parser_options(),
            autolinks: options.autolinks_enabled(),
            highlighter: None,
        }
    }

    /// Enable code highlighting when the config asks for it
    pub fn with_highlight(mut self, config: &HighlightConfig) -> Self {
        self.highlighter = config
            .enable
            .then(|| Highlighter::new(&config.theme, config.line_number));
        self
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> SafeHtml {
        let parser = TextMergeStream::new(Parser::new_ext(markdown, self.options));
        let events = if self.autolinks {
            autolink(parser)
        } else {
            parser.collect()
        };

        let mut html_output = String::new();
        match &self.highlighter {
            Some(highlighter) => html::push_html(
                &mut html_output,
                highlighter.rewrite(events.into_iter()).into_iter(),
            ),
            None => html::push_html(&mut html_output, events.into_iter()),
        }

        let len = html_output.trim_end_matches('\n').len();
        html_output.truncate(len);
        SafeHtml::from_trusted(html_output)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static! {
    static ref BARE_URL: Regex = Regex::new(r"(?:https?://|www\.)[^\s<]+").unwrap();
}

/// Turn bare URLs in text into links, leaving code and existing links alone
fn autolink<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut skip_depth = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                skip_depth += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                skip_depth = skip_depth.saturating_sub(1);
                out.push(event);
            }
            Event::Text(text) if skip_depth == 0 => link_text(&text, &mut out),
            event => out.push(event),
        }
    }

    out
}

fn link_text<'a>(text: &str, out: &mut Vec<Event<'a>>) {
    let mut last = 0;

    for m in BARE_URL.find_iter(text) {
        let boundary = text[..m.start()]
            .chars()
            .next_back()
            .map_or(true, |c| c.is_whitespace() || matches!(c, '*' | '_' | '~' | '('));
        if !boundary {
            continue;
        }

        let url = trim_url(m.as_str());
        let scheme_len = if url.starts_with("www.") {
            "www.".len()
        } else {
            url.find("://").map_or(0, |i| i + "://".len())
        };
        if url.len() <= scheme_len {
            continue;
        }

        if m.start() > last {
            out.push(Event::Text(CowStr::from(text[last..m.start()].to_string())));
        }
        let href = if url.starts_with("www.") {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_string())));
        out.push(Event::End(TagEnd::Link));
        last = m.start() + url.len();
    }

    if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Drop trailing punctuation and unbalanced closing parentheses
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let Some(last) = url.chars().next_back() else {
            return url;
        };
        let trim = match last {
            '?' | '!' | '.' | ',' | ':' | '*' | '_' | '~' | '\'' | '"' => true,
            ')' => url.matches(')').count() > url.matches('(').count(),
            _ => false,
        };
        if !trim {
            return url;
        }
        url = &url[..url.len() - last.len_utf8()];
    }
}

/// Replaces fenced and indented code blocks with syntect output
struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl Highlighter {
    fn new(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    fn rewrite<'a>(&self, parser: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut code: Option<(Option<String>, String)> = None;

        for event in parser {
            if let Some((_, buf)) = code.as_mut() {
                match event {
                    Event::Text(text) => buf.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, buf)) = code.take() {
                            let highlighted = self.highlight_code(&buf, lang.as_deref());
                            events.push(Event::Html(CowStr::from(highlighted)));
                        }
                    }
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(str::to_string)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code = Some((lang, String::new()));
                }
                event => events.push(event),
            }
        }

        events
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(highlighted) if self.line_numbers => add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                escape(lang),
                highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape(lang),
                escape(code)
            ),
        }
    }
}

/// Add a line-number gutter to highlighted code
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        escape(lang),
        gutter,
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_inline_emphasis() {
        let html = MarkdownRenderer::new().render("hi *there*");
        assert_eq!(html.as_str(), "<p>hi <em>there</em></p>");
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = MarkdownRenderer::new().render("# Hello World\n\nThis is a test.");
        assert!(html.as_str().contains("<h1>Hello World</h1>"));
        assert!(html.as_str().contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_gfm_extensions_enabled_by_default() {
        let renderer = MarkdownRenderer::new();

        let table = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(table.as_str().contains("<table>"));

        let strike = renderer.render("~~gone~~");
        assert!(strike.as_str().contains("<del>gone</del>"));

        let tasks = renderer.render("- [x] done\n- [ ] todo");
        assert!(tasks.as_str().contains(r#"type="checkbox""#));
    }

    #[test]
    fn test_autolink_bare_urls() {
        let html = MarkdownRenderer::new().render("see https://example.com and www.example.org");
        assert_eq!(
            html.as_str(),
            r#"<p>see <a href="https://example.com">https://example.com</a> and <a href="http://www.example.org">www.example.org</a></p>"#
        );
    }

    #[test]
    fn test_autolink_trailing_punctuation() {
        let html = MarkdownRenderer::new().render("Visit https://example.com. Or (https://example.com/c)!");
        assert_eq!(
            html.as_str(),
            r#"<p>Visit <a href="https://example.com">https://example.com</a>. Or (<a href="https://example.com/c">https://example.com/c</a>)!</p>"#
        );
        assert_eq!(trim_url("https://example.com/a_(b)."), "https://example.com/a_(b)");
    }

    #[test]
    fn test_autolink_skips_code_and_links() {
        let renderer = MarkdownRenderer::new();

        let code = renderer.render("`https://example.com`\n\n```\nhttps://example.com\n```");
        assert!(!code.as_str().contains("<a "));

        let link = renderer.render("[https://example.com](https://example.com)");
        assert_eq!(link.as_str().matches("<a ").count(), 1);

        let word = renderer.render("xhttps://example.com");
        assert!(!word.as_str().contains("<a "));
    }

    #[test]
    fn test_autolinks_can_be_disabled() {
        let options = MarkdownOptions {
            autolinks: Some(false),
            ..Default::default()
        };
        let html = MarkdownRenderer::with_options(&options).render("see https://example.com");
        assert_eq!(html.as_str(), "<p>see https://example.com</p>");
    }

    #[test]
    fn test_caller_options_override_defaults() {
        let options = MarkdownOptions {
            tables: Some(false),
            smart_punctuation: Some(true),
            ..Default::default()
        };
        let renderer = MarkdownRenderer::with_options(&options);

        let table = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(!table.as_str().contains("<table>"));

        let quotes = renderer.render("\"quoted\"");
        assert!(quotes.as_str().contains('\u{201c}'));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = MarkdownRenderer::new().render("<div class=\"x\">raw</div>");
        assert_eq!(html.as_str(), "<div class=\"x\">raw</div>");
    }

    #[test]
    fn test_highlight_disabled_keeps_plain_code_block() {
        let html = MarkdownRenderer::new().render("```rust\nfn main() {}\n```");
        assert!(html.as_str().contains(r#"<code class="language-rust">"#));
    }

    #[test]
    fn test_render_highlighted_code_block() {
        let config = HighlightConfig {
            enable: true,
            ..Default::default()
        };
        let renderer = MarkdownRenderer::new().with_highlight(&config);
        let html = renderer.render("Before\n\n```rust\nfn main() {}\n```\n\nAfter");

        assert!(html.as_str().contains("highlight rust"));
        assert!(html.as_str().contains("line-number"));
        assert!(html.as_str().contains("<p>Before</p>"));
        assert!(html.as_str().contains("<p>After</p>"));
    }
}
