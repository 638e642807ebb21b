//! Flat `key=value` documents.
//!
//! Responsibilities:
//! - Parse the line-oriented `key=value` format used by remote, cached and
//!   fallback configs.
//! - Render documents back to that format, optionally with a comment header.
//! - Merge two documents with per-key shadowing.
//!
//! Does NOT handle:
//! - Reading files or making requests (see `fetch.rs` and `cache.rs`).
//! - Typed values; every value is a string.
//!
//! Invariants:
//! - Every document can be rendered and parsed back to an equal document;
//!   `insert` rejects keys and values that would break this.
//! - Duplicate keys while parsing: the last occurrence wins.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// An in-memory mapping from config key to config value.
///
/// Backed by a `BTreeMap` so rendered output is stable; key order carries
/// no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    entries: BTreeMap<String, String>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a `key=value` text resource.
    ///
    /// Blank lines and lines starting with `#` or `!` are skipped. Each entry
    /// is split at the first `=`, or at the first `:` when the line has no
    /// `=`. Surrounding whitespace is trimmed from keys and values.
    ///
    /// Java-properties escapes are not interpreted: a backslash is kept as
    /// written (`https\://host` stays `https\://host`), and a trailing
    /// backslash does not continue the entry on the next line.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut entries = BTreeMap::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let split = line.split_once('=').or_else(|| line.split_once(':'));
            let Some((key, value)) = split else {
                return Err(DocumentError::MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                });
            };

            let key = key.trim();
            if key.is_empty() {
                return Err(DocumentError::MalformedLine {
                    line: index + 1,
                    content: line.to_string(),
                });
            }

            entries.insert(key.to_string(), value.trim().to_string());
        }

        Ok(Self { entries })
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns true if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts an entry, returning the previous value for the key.
    ///
    /// # Errors
    /// Rejects keys and values that could not be parsed back from the
    /// rendered form.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, DocumentError> {
        let key = key.into();
        let value = value.into();

        if !is_valid_key(&key) {
            return Err(DocumentError::InvalidKey(key));
        }
        if value.contains(['\n', '\r']) || value.trim() != value {
            return Err(DocumentError::InvalidValue { key });
        }

        Ok(self.entries.insert(key, value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over `(key, value)` pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a new document with `self` layered on top of `base`.
    ///
    /// Keys present in both take the value from `self`.
    pub fn overlay(&self, base: &Document) -> Document {
        let mut entries = base.entries.clone();
        entries.extend(self.entries.iter().map(|(k, v)| (k.clone(), v.clone())));
        Document { entries }
    }

    /// Renders the document as `key=value` lines, preceded by `# header`
    /// when a header is given.
    pub fn render(&self, header: Option<&str>) -> String {
        let mut out = String::new();
        if let Some(header) = header {
            for line in header.lines() {
                out.push_str("# ");
                out.push_str(line);
                out.push('\n');
            }
        }
        for (key, value) in &self.entries {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.trim() == key
        && !key.starts_with(['#', '!'])
        && !key.contains(['=', ':', '\n', '\r'])
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let doc = Document::parse(
            "# Config of app demo\n\
             \n\
             ! legacy comment\n\
             configSource=remote\n\
             \t  \n\
             timeout = 30\n",
        )
        .unwrap();

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get("configSource"), Some("remote"));
        assert_eq!(doc.get("timeout"), Some("30"));
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let doc = Document::parse("a=1\nb=2\na=3\n").unwrap();
        assert_eq!(doc.get("a"), Some("3"));
        assert_eq!(doc.len(), 2);
    }

    #[test]
    fn test_parse_splits_on_first_equals_only() {
        let doc = Document::parse("url=https://example.com/?a=b\n").unwrap();
        assert_eq!(doc.get("url"), Some("https://example.com/?a=b"));
    }

    #[test]
    fn test_parse_accepts_colon_separator() {
        let doc = Document::parse("name: value\n").unwrap();
        assert_eq!(doc.get("name"), Some("value"));
    }

    #[test]
    fn test_parse_keeps_backslashes_verbatim() {
        let doc = Document::parse("url=https\\://host\nlong=one \\\nnext=2\n").unwrap();
        assert_eq!(doc.get("url"), Some("https\\://host"));
        assert_eq!(doc.get("long"), Some("one \\"));
        assert_eq!(doc.get("next"), Some("2"));
    }

    #[test]
    fn test_parse_allows_empty_value() {
        let doc = Document::parse("empty=\n").unwrap();
        assert!(doc.contains("empty"));
        assert_eq!(doc.get("empty"), Some(""));
    }

    #[test]
    fn test_parse_strips_bom_and_crlf() {
        let doc = Document::parse("\u{feff}a=1\r\nb=2\r\n").unwrap();
        assert_eq!(doc.get("a"), Some("1"));
        assert_eq!(doc.get("b"), Some("2"));
    }

    #[test]
    fn test_parse_rejects_line_without_separator() {
        let err = Document::parse("a=1\njust some words\n").unwrap_err();
        assert_eq!(
            err,
            DocumentError::MalformedLine {
                line: 2,
                content: "just some words".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_empty_key() {
        let err = Document::parse("=orphan\n").unwrap_err();
        assert!(matches!(err, DocumentError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn test_insert_rejects_unrenderable_entries() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.insert("a=b", "x"),
            Err(DocumentError::InvalidKey(_))
        ));
        assert!(matches!(
            doc.insert("#comment", "x"),
            Err(DocumentError::InvalidKey(_))
        ));
        assert!(matches!(
            doc.insert("k", "two\nlines"),
            Err(DocumentError::InvalidValue { .. })
        ));
        assert_eq!(doc.insert("k", "v").unwrap(), None);
        assert_eq!(doc.insert("k", "w").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_overlay_prefers_top_document() {
        let remote = Document::parse("configSource=mergedRemote\nremoteParam=yes\n").unwrap();
        let local = Document::parse("configSource=mergedLocal\nlocalParam=yes\n").unwrap();

        let merged = remote.overlay(&local);
        assert_eq!(merged.get("configSource"), Some("mergedRemote"));
        assert_eq!(merged.get("remoteParam"), Some("yes"));
        assert_eq!(merged.get("localParam"), Some("yes"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_render_with_header_parses_back() {
        let doc = Document::parse("b=2\na=1\n").unwrap();
        let rendered = doc.render(Some("Config of app demo"));

        assert!(rendered.starts_with("# Config of app demo\n"));
        assert!(rendered.contains("a=1\n"));
        assert!(rendered.contains("b=2\n"));
        assert_eq!(Document::parse(&rendered).unwrap(), doc);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let doc = Document::parse("a=1\n").unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"a":"1"}"#);
    }
}
