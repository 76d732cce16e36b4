//! Shared types used across the collector, renderer, and generator.
//!
//! Items are read-only from this crate's point of view: they come from the
//! content tree (see [`crate::content`]) and are only ordered and rendered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single publishable item from the content tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Output location relative to the site root, e.g. `posts/first-post`
    pub path: String,
    pub title: String,
    /// Short summary shown as the entry's `<summary>`
    #[serde(default)]
    pub description: String,
    /// Rendered HTML body, emitted verbatim as the entry's `<content>`
    #[serde(default)]
    pub content: String,
    /// Publication date. The feed is ordered on this field, newest first.
    pub date: DateTime<Utc>,
    /// Last modification time; never earlier than `date`.
    pub last_modified: DateTime<Utc>,
}

/// Site-level metadata embedded at the top of every feed.
///
/// Passed explicitly to the renderer rather than read from global state, so
/// rendering stays a pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteMetadata {
    /// Canonical site URL, e.g. `https://example.com`
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl SiteMetadata {
    /// Absolute URL for a site-relative path, joined with exactly one `/`.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(url: &str) -> SiteMetadata {
        SiteMetadata {
            url: url.into(),
            name: "Site".into(),
            description: String::new(),
        }
    }

    #[test]
    fn url_for_joins_with_single_slash() {
        assert_eq!(
            site("https://example.com").url_for("posts/a"),
            "https://example.com/posts/a"
        );
        assert_eq!(
            site("https://example.com/").url_for("/posts/a"),
            "https://example.com/posts/a"
        );
    }

    #[test]
    fn url_for_empty_path_is_site_url() {
        assert_eq!(
            site("https://example.com/").url_for(""),
            "https://example.com"
        );
    }

    #[test]
    fn item_deserializes_rfc3339_dates() {
        let json = r#"{
            "path": "posts/a",
            "title": "A",
            "date": "2024-01-02T03:04:05Z",
            "last_modified": "2024-01-03T00:00:00Z"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.title, "A");
        assert!(item.description.is_empty());
        assert!(item.last_modified > item.date);
    }
}
