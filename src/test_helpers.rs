//! Shared test utilities for the simple-feed test suite.
//!
//! Builders for items, site metadata and configs keyed on small integers, so
//! tests read as timelines:
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut tree = ContentTree::default();
//! tree.insert("posts", item("Hello", 1)); // published at day 1
//! generator.generate(&feed_config(), &context, at(10)); // built at day 10
//! ```

use crate::config::FeedConfig;
use crate::render::{AtomRenderer, FeedRenderer, RenderError, RenderInput};
use crate::types::{Item, SiteMetadata};
use chrono::{DateTime, TimeZone, Utc};
use std::cell::Cell;
use std::collections::BTreeSet;

// =========================================================================
// Builders
// =========================================================================

/// A fixed point in time, `day` days after 2024-01-01.
pub fn at(day: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(day)
}

/// An item published and last modified on `day`, at `posts/<slug of title>`.
pub fn item(title: &str, day: i64) -> Item {
    let slug = title.to_lowercase().replace(' ', "-");
    Item {
        path: format!("posts/{slug}"),
        title: title.to_string(),
        description: format!("About {title}"),
        content: format!("<p>{title}</p>"),
        date: at(day),
        last_modified: at(day),
    }
}

pub fn site(url: &str) -> SiteMetadata {
    SiteMetadata {
        url: url.to_string(),
        name: "Example Site".to_string(),
        description: "A site for tests".to_string(),
    }
}

pub fn feed_config() -> FeedConfig {
    FeedConfig::default()
}

pub fn sections(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

// =========================================================================
// Extractors
// =========================================================================

/// Item titles in order.
pub fn titles(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.title.as_str()).collect()
}

// =========================================================================
// Renderers
// =========================================================================

/// Atom renderer that counts how often it was asked to render.
#[derive(Debug, Default)]
pub struct CountingRenderer {
    calls: Cell<usize>,
}

impl CountingRenderer {
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl FeedRenderer for CountingRenderer {
    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError> {
        self.calls.set(self.calls.get() + 1);
        AtomRenderer.render(input)
    }
}
