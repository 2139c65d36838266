//! forge::links
//!
//! RFC 5988 `Link` header parsing.
//!
//! GitHub paginates collections and advertises navigation in a header like:
//!
//! ```text
//! <https://api.github.com/repositories/1/commits?page=2>; rel="next", <https://api.github.com/repositories/1/commits?page=5>; rel="last"
//! ```
//!
//! The last page carries no `next` relation.

use super::error::ForgeError;

/// Relation names parsed from a `Link` header, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<(String, String)>,
}

impl LinkSet {
    /// Parse a `Link` header value.
    ///
    /// An empty header yields an empty set. Each non-empty entry must be
    /// `<URL>; rel="name"` (further `; key=value` parameters are allowed).
    ///
    /// # Errors
    ///
    /// [`ForgeError::LinkParse`] naming the first malformed entry.
    ///
    /// # Example
    ///
    /// ```
    /// use git_utils::forge::LinkSet;
    ///
    /// let links = LinkSet::parse(r#"<https://x/?page=2>; rel="next", <https://x/?page=9>; rel="last""#).unwrap();
    /// assert_eq!(links.get("next"), Some("https://x/?page=2"));
    /// assert_eq!(links.get("prev"), None);
    /// ```
    pub fn parse(header: &str) -> Result<Self, ForgeError> {
        let mut links = Vec::new();
        for entry in split_entries(header).filter(|e| !e.is_empty()) {
            links.push(parse_entry(entry)?);
        }
        Ok(Self { links })
    }

    /// URL for a relation. A repeated relation resolves to its last entry.
    pub fn get(&self, rel: &str) -> Option<&str> {
        self.links
            .iter()
            .rev()
            .find(|(name, _)| name == rel)
            .map(|(_, url)| url.as_str())
    }

    /// The `next` relation.
    pub fn next(&self) -> Option<&str> {
        self.get("next")
    }

    /// The `last` relation.
    pub fn last(&self) -> Option<&str> {
        self.get("last")
    }

    /// `(rel, url)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links.iter().map(|(r, u)| (r.as_str(), u.as_str()))
    }

    /// Number of parsed entries.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the header had no entries.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Split on commas that are not inside `<...>`, trimming each entry.
fn split_entries(header: &str) -> impl Iterator<Item = &str> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in header.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                entries.push(header[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(header[start..].trim());
    entries.into_iter()
}

fn parse_entry(entry: &str) -> Result<(String, String), ForgeError> {
    let malformed = || ForgeError::LinkParse {
        entry: entry.to_string(),
    };

    let mut parts = entry.split(';').map(str::trim);
    let target = parts.next().ok_or_else(malformed)?;
    let url = target
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .filter(|u| !u.is_empty() && !u.contains(['<', '>']))
        .ok_or_else(malformed)?;

    let mut rel = None;
    for param in parts {
        let (key, value) = param.split_once('=').ok_or_else(malformed)?;
        if key.trim().eq_ignore_ascii_case("rel") {
            let name = value
                .trim()
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .filter(|v| !v.is_empty() && !v.contains('"'))
                .ok_or_else(malformed)?;
            if rel.replace(name).is_some() {
                return Err(malformed());
            }
        }
    }

    let rel = rel.ok_or_else(malformed)?;
    Ok((rel.to_string(), url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GITHUB_HEADER: &str = "<https://api.github.com/repositories/12345/commits?page=2>; rel=\"next\", <https://api.github.com/repositories/12345/commits?page=5>; rel=\"last\"";

    #[test]
    fn parses_github_header() {
        let links = LinkSet::parse(GITHUB_HEADER).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(
            links.next(),
            Some("https://api.github.com/repositories/12345/commits?page=2")
        );
        assert_eq!(
            links.last(),
            Some("https://api.github.com/repositories/12345/commits?page=5")
        );
    }

    #[test]
    fn preserves_order() {
        let header = r#"<https://a/?page=1>; rel="first", <https://a/?page=3>; rel="prev""#;
        let rels: Vec<_> = LinkSet::parse(header)
            .unwrap()
            .iter()
            .map(|(rel, _)| rel.to_string())
            .collect();
        assert_eq!(rels, vec!["first", "prev"]);
    }

    #[test]
    fn empty_header_has_no_links() {
        assert!(LinkSet::parse("").unwrap().is_empty());
        assert!(LinkSet::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn tolerates_tight_spacing() {
        let links = LinkSet::parse(r#"<https://a/?page=2>;rel="next",<https://a/?page=4>;rel="last""#)
            .unwrap();
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn extra_parameters_are_allowed() {
        let links = LinkSet::parse(r#"<https://a/2>; title="page two"; rel="next""#).unwrap();
        assert_eq!(links.next(), Some("https://a/2"));
    }

    #[test]
    fn commas_inside_urls_are_kept() {
        let header = r#"<https://a/issues?labels=bug,ui&page=2>; rel="next""#;
        let links = LinkSet::parse(header).unwrap();
        assert_eq!(links.next(), Some("https://a/issues?labels=bug,ui&page=2"));
    }

    #[test]
    fn missing_angle_brackets_is_rejected() {
        let err = LinkSet::parse(r#"https://a/2; rel="next""#).unwrap_err();
        assert!(matches!(err, ForgeError::LinkParse { entry } if entry.starts_with("https://a/2")));
    }

    #[test]
    fn missing_rel_is_rejected() {
        assert!(LinkSet::parse("<https://a/2>").is_err());
        assert!(LinkSet::parse(r#"<https://a/2>; title="x""#).is_err());
    }

    #[test]
    fn unquoted_rel_is_rejected() {
        assert!(LinkSet::parse("<https://a/2>; rel=next").is_err());
    }

    #[test]
    fn malformed_entry_after_valid_one_is_named() {
        let header = r#"<https://a/2>; rel="next", nonsense"#;
        match LinkSet::parse(header) {
            Err(ForgeError::LinkParse { entry }) => assert_eq!(entry, "nonsense"),
            other => panic!("expected LinkParse, got {:?}", other),
        }
    }
}
