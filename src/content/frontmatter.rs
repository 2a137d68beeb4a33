//! Front-matter parsing

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;

lazy_static! {
    /// A `---` line, the YAML payload, and a closing `---` line, anchored at
    /// the very start of the document.
    static ref FRONTMATTER_RE: Regex =
        Regex::new(r"\A---\r?\n(?s:(.+?))\r?\n---(?:\r?\n|\z)").unwrap();
}

/// Metadata read from a document's front-matter.
///
/// Lookups return `Option` so templates can ask for keys a document never set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Meta(IndexMap<String, Value>);

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a value only if it is a YAML string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Meta {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A document split into its metadata and the markdown that follows it
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter<'a> {
    /// Suffix of the source text with the front-matter block removed
    pub body: &'a str,
    pub meta: Meta,
}

impl<'a> Frontmatter<'a> {
    /// The whole text as body, no metadata
    fn plain(text: &'a str) -> Self {
        Self {
            body: text,
            meta: Meta::new(),
        }
    }
}

/// Split a leading YAML front-matter block from `text`.
///
/// The split is only used when the block parses to a YAML mapping. A block
/// that fails to parse, or parses to a scalar, sequence or null, leaves the
/// whole text as body with empty metadata.
pub fn parse_yaml_frontmatter(text: &str) -> Frontmatter<'_> {
    let Some(caps) = FRONTMATTER_RE.captures(text) else {
        return Frontmatter::plain(text);
    };
    let (Some(block), Some(yaml)) = (caps.get(0), caps.get(1)) else {
        return Frontmatter::plain(text);
    };

    match parse_metadata(yaml.as_str()) {
        Ok(Some(meta)) => Frontmatter {
            body: &text[block.end()..],
            meta,
        },
        Ok(None) => {
            tracing::debug!("Front-matter is not a mapping, treating it as content");
            Frontmatter::plain(text)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse YAML front-matter, treating as content: {}",
                e
            );
            Frontmatter::plain(text)
        }
    }
}

/// Parse a YAML payload as plain data.
///
/// Returns `Ok(None)` when the document is valid YAML but not a mapping.
/// Tags are kept as inert [`Value::Tagged`] values and timestamps stay strings.
pub fn parse_metadata(yaml: &str) -> Result<Option<Meta>, serde_yaml::Error> {
    let mapping = match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => mapping,
        _ => return Ok(None),
    };

    let meta = mapping
        .into_iter()
        .filter_map(|(key, value)| {
            let key = match key {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key, value))
        })
        .collect();

    Ok(Some(meta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_frontmatter() {
        for text in ["", "hi *there*", "# Title\n\nBody", "--\nnot: fm\n--\n"] {
            let fm = parse_yaml_frontmatter(text);
            assert_eq!(fm.body, text);
            assert!(fm.meta.is_empty());
        }
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let fm = parse_yaml_frontmatter("---\ntitle: go\n---\nhi *there*");
        assert_eq!(fm.body, "hi *there*");
        assert_eq!(fm.meta.len(), 1);
        assert_eq!(fm.meta.get_str("title"), Some("go"));
        assert_eq!(fm.meta.get("missing"), None);
    }

    #[test]
    fn test_body_round_trip() {
        let cases = [
            ("---\ntitle: Hello World\ntags:\n  - rust\n---\n", "\nThis is the content.\n"),
            ("---\na: 1\n---\n", ""),
            ("---\nlayout: page\n---", ""),
            ("---\nx: y\n---\n", "---\nstill body\n---\n"),
            ("---\r\ntitle: crlf\r\n---\r\n", "body\r\n"),
        ];

        for (block, body) in cases {
            let text = format!("{block}{body}");
            let fm = parse_yaml_frontmatter(&text);
            assert_eq!(fm.body, body, "body of {text:?}");

            let yaml = block
                .trim_start_matches("---")
                .trim_end_matches(['\r', '\n'])
                .trim_end_matches("---");
            assert_eq!(Some(fm.meta), parse_metadata(yaml).unwrap());
        }
    }

    #[test]
    fn test_leading_whitespace_is_not_frontmatter() {
        let text = "\n---\ntitle: nope\n---\nbody";
        let fm = parse_yaml_frontmatter(text);
        assert_eq!(fm.body, text);
        assert!(fm.meta.is_empty());
    }

    #[test]
    fn test_four_dashes_do_not_close_block() {
        let text = "---\ntitle: a\n----\nbody";
        let fm = parse_yaml_frontmatter(text);
        assert_eq!(fm.body, text);
        assert!(fm.meta.is_empty());
    }

    #[test]
    fn test_non_mapping_yaml_is_ignored() {
        for text in [
            "---\njust a scalar\n---\nbody",
            "---\n- one\n- two\n---\nbody",
            "---\n~\n---\nbody",
        ] {
            let fm = parse_yaml_frontmatter(text);
            assert_eq!(fm.body, text);
            assert!(fm.meta.is_empty());
        }
    }

    #[test]
    fn test_malformed_yaml_falls_back() {
        let text = "---\ntitle: [unclosed\n---\nStill rendered.";
        let fm = parse_yaml_frontmatter(text);
        assert_eq!(fm.body, text);
        assert!(fm.meta.is_empty());
    }

    #[test]
    fn test_thematic_breaks_not_yaml() {
        let text = "---\nSome thoughts\n-- 2025-11-09\n\n---\nMore content here.\n";
        let fm = parse_yaml_frontmatter(text);
        assert!(fm.meta.is_empty());
        assert!(fm.body.contains("Some thoughts"));
    }

    #[test]
    fn test_values_stay_plain_data() {
        let yaml = "date: 2024-01-15\ncount: 3\ndraft: false\nobj: !custom foo\n1: one\ntrue: yes";
        let meta = parse_metadata(yaml).unwrap().unwrap();

        assert_eq!(meta.get_str("date"), Some("2024-01-15"));
        assert_eq!(meta.get("count").and_then(Value::as_u64), Some(3));
        assert_eq!(meta.get("draft").and_then(Value::as_bool), Some(false));
        assert!(matches!(meta.get("obj"), Some(Value::Tagged(_))));
        assert_eq!(meta.get_str("1"), Some("one"));
        assert_eq!(meta.get_str("true"), Some("yes"));
    }

    #[test]
    fn test_meta_preserves_key_order() {
        let meta = parse_metadata("b: 1\na: 2\nc: 3").unwrap().unwrap();
        let keys: Vec<_> = meta.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }
}
