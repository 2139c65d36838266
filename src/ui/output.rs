//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Responses are printed as JSON with object keys sorted. Keys ending in
//! `url` are dropped first: GitHub responses carry dozens of hypermedia
//! links per object that bury the data. Output is pretty-printed when
//! stdout is a terminal and compact otherwise, so piped output stays one
//! document per line. A top-level array prints one element per document.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use serde_json::{Map, Value};

/// How JSON documents are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Indented, for terminals
    Pretty,
    /// One document per line
    Compact,
}

impl Layout {
    /// Pretty when stdout is a terminal.
    pub fn detect() -> Self {
        if io::stdout().is_terminal() {
            Layout::Pretty
        } else {
            Layout::Compact
        }
    }
}

/// Whether a key names a URL.
pub fn is_url_key(key: &str) -> bool {
    key.ends_with("url")
}

/// Recursively remove object entries whose key ends in `url`.
///
/// Remaining entries are rebuilt in key order.
///
/// # Example
///
/// ```
/// use git_utils::ui::output::delete_url_keys;
/// use serde_json::json;
///
/// let value = json!({"name": "x", "html_url": "h", "owner": {"login": "o", "url": "u"}});
/// assert_eq!(delete_url_keys(value), json!({"name": "x", "owner": {"login": "o"}}));
/// ```
pub fn delete_url_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map
                .into_iter()
                .filter(|(key, _)| !is_url_key(key))
                .map(|(key, value)| (key, delete_url_keys(value)))
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(delete_url_keys).collect()),
        other => other,
    }
}

/// Render one document.
pub fn render(value: &Value, layout: Layout) -> String {
    let rendered = match layout {
        Layout::Pretty => serde_json::to_string_pretty(value),
        Layout::Compact => serde_json::to_string(value),
    };
    // Serializing a `Value` cannot fail.
    rendered.unwrap_or_default()
}

/// Write a response body, one document per array element.
pub fn write_json<W: Write>(out: &mut W, value: Value, layout: Layout) -> io::Result<()> {
    match delete_url_keys(value) {
        Value::Array(items) => {
            for item in items {
                writeln!(out, "{}", render(&item, layout))?;
            }
            Ok(())
        }
        other => writeln!(out, "{}", render(&other, layout)),
    }
}

/// Print a response body to stdout.
pub fn print_json(value: Value) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, value, Layout::detect())
}

/// Print a plain line to stdout.
pub fn print(message: impl Display) {
    println!("{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn written(value: Value, layout: Layout) -> String {
        let mut out = Vec::new();
        write_json(&mut out, value, layout).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn url_keys_removed_recursively() {
        let value = json!([
            {"sha": "a", "url": "u", "commit": {"tree": {"sha": "t", "url": "u"}}},
            {"sha": "b", "comments_url": "c", "parents": [{"sha": "a", "html_url": "h"}]}
        ]);
        assert_eq!(
            delete_url_keys(value),
            json!([
                {"sha": "a", "commit": {"tree": {"sha": "t"}}},
                {"sha": "b", "parents": [{"sha": "a"}]}
            ])
        );
    }

    #[test]
    fn url_inside_key_is_kept() {
        let value = json!({"url_template": 1, "avatar_url": 2});
        assert_eq!(delete_url_keys(value), json!({"url_template": 1}));
    }

    #[test]
    fn url_values_are_kept() {
        let value = json!({"homepage": "https://example.com"});
        assert_eq!(delete_url_keys(value.clone()), value);
    }

    #[test]
    fn keys_are_sorted() {
        let value: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": {"b": 1, "a": 2}}"#).unwrap();
        assert_eq!(
            written(value, Layout::Compact),
            "{\"alpha\":{\"a\":2,\"b\":1},\"zeta\":1}\n"
        );
    }

    #[test]
    fn arrays_print_one_element_per_line() {
        let out = written(json!([{"a": 1}, {"b": 2}]), Layout::Compact);
        assert_eq!(out, "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn objects_print_as_one_document() {
        let out = written(json!({"a": [1, 2]}), Layout::Compact);
        assert_eq!(out, "{\"a\":[1,2]}\n");
    }

    #[test]
    fn pretty_layout_indents() {
        let out = written(json!({"a": 1}), Layout::Pretty);
        assert_eq!(out, "{\n  \"a\": 1\n}\n");
    }
}
