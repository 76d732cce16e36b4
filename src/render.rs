//! Atom document assembly and serialization.
//!
//! The renderer is a pure function of a [`RenderInput`]: the same items,
//! config, site metadata and build time always produce byte-identical text.
//! The cache relies on this, since a reused feed must be indistinguishable
//! from a fresh render.
//!
//! ## Document Shape
//!
//! ```text
//! feed
//! ├── id                    site URL
//! ├── title / subtitle      site name / description
//! ├── author/name           FeedConfig::author
//! ├── link rel=alternate    site URL
//! ├── link rel=self         site URL + target path
//! ├── updated               build time
//! └── entry (newest first, at most maximum_item_count)
//!     ├── id                item URL
//!     ├── title / summary
//!     ├── link rel=alternate item URL
//!     ├── content type=html
//!     ├── published         Item::date
//!     └── updated           Item::last_modified
//! ```
//!
//! Every URL in the document goes through [`canonical`], so each ends in `/`.

use crate::config::{FeedConfig, Indentation};
use crate::types::{Item, SiteMetadata};
use atom_syndication::{Content, Entry, Feed, Link, Person, Text, WriteConfig};
use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Atom serialization error: {0}")]
    Atom(#[from] atom_syndication::Error),
    #[error("Serialized feed is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Everything a feed render depends on.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    /// Collected items, newest first, not yet truncated.
    pub items: &'a [Item],
    pub config: &'a FeedConfig,
    pub site: &'a SiteMetadata,
    /// Stamped into the feed's `<updated>`.
    pub build_time: DateTime<Utc>,
}

/// Turns collected items into serialized feed text.
pub trait FeedRenderer {
    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError>;
}

/// Renders Atom 1.0 documents with `atom_syndication`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomRenderer;

impl FeedRenderer for AtomRenderer {
    fn render(&self, input: &RenderInput<'_>) -> Result<String, RenderError> {
        let feed = build_feed(input);
        let write_config = WriteConfig {
            write_document_declaration: true,
            indent_size: match input.config.indentation {
                Indentation::None => None,
                Indentation::Spaces(n) => Some(n),
            },
        };
        let bytes = feed.write_with_config(Vec::new(), write_config)?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Append a trailing `/` unless one is already there.
pub fn canonical(reference: &str) -> String {
    if reference.ends_with('/') {
        reference.to_string()
    } else {
        format!("{reference}/")
    }
}

/// Assemble the in-memory Atom document.
pub fn build_feed(input: &RenderInput<'_>) -> Feed {
    let site_url = canonical(&input.site.url);
    let self_url = canonical(&input.site.url_for(&input.config.target_path));

    let mut author = Person::default();
    author.set_name(input.config.author.clone());

    let entries: Vec<Entry> = input
        .items
        .iter()
        .take(input.config.maximum_item_count)
        .map(|item| build_entry(item, input.site))
        .collect();

    let mut feed = Feed::default();
    feed.set_id(site_url.clone());
    feed.set_title(Text::plain(input.site.name.clone()));
    feed.set_subtitle(Text::plain(input.site.description.clone()));
    feed.set_authors(vec![author]);
    feed.set_links(vec![link(site_url, "alternate"), link(self_url, "self")]);
    feed.set_updated(fixed(input.build_time));
    feed.set_entries(entries);
    feed
}

fn build_entry(item: &Item, site: &SiteMetadata) -> Entry {
    let item_url = canonical(&site.url_for(&item.path));

    let mut content = Content::default();
    content.set_content_type("html".to_string());
    content.set_value(item.content.clone());

    let mut entry = Entry::default();
    entry.set_id(item_url.clone());
    entry.set_title(Text::plain(item.title.clone()));
    entry.set_summary(Text::plain(item.description.clone()));
    entry.set_links(vec![link(item_url, "alternate")]);
    entry.set_content(content);
    entry.set_published(fixed(item.date));
    entry.set_updated(fixed(item.last_modified));
    entry
}

fn link(href: String, rel: &str) -> Link {
    let mut link = Link::default();
    link.set_href(href);
    link.set_rel(rel);
    link
}

fn fixed(date: DateTime<Utc>) -> DateTime<FixedOffset> {
    date.into()
}
