//! Feed and site configuration.
//!
//! Two layers live here:
//!
//! - [`FeedConfig`]: the per-feed generation parameters. This is the value the
//!   cache is keyed on, so it derives `PartialEq` and every field participates
//!   in cache validity.
//! - [`SiteConfig`]: the `feed.toml` file the CLI reads, holding site metadata,
//!   the sections to include, and one `[[feeds]]` table per output feed.
//!
//! ## Config File
//!
//! ```toml
//! sections = ["posts"]
//!
//! [site]
//! url = "https://example.com"
//! name = "Example"
//! description = "Notes and essays"
//!
//! [[feeds]]
//! target_path = "feed.xml"
//! author = "Jane Doe"
//! maximum_item_count = 100
//! ttl_interval = 0
//! indentation = { spaces = 2 }
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::SiteMetadata;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    Missing(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// How the serialized feed is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indentation {
    /// Everything on one line.
    #[default]
    None,
    /// Pretty-printed, nesting indented by the given number of spaces.
    Spaces(usize),
}

/// Parameters for generating one Atom feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    /// Output path relative to the output root, e.g. `feed.xml`.
    pub target_path: String,
    /// Feed author name. May be empty.
    pub author: String,
    /// Entries beyond this many (newest first) are dropped. Zero is allowed
    /// and yields a feed with no entries.
    pub maximum_item_count: usize,
    /// Advisory refresh interval in seconds.
    pub ttl_interval: u64,
    pub indentation: Indentation,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            target_path: "feed.xml".to_string(),
            author: String::new(),
            maximum_item_count: 100,
            ttl_interval: 0,
            indentation: Indentation::None,
        }
    }
}

impl FeedConfig {
    /// Reject target paths that are empty or escape the output root.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path = Path::new(&self.target_path);
        if self.target_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feeds.target_path must not be empty".into(),
            ));
        }
        if !path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ConfigError::Validation(format!(
                "feeds.target_path must be relative to the output root: {}",
                self.target_path
            )));
        }
        Ok(())
    }
}

/// Site configuration loaded from `feed.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-level metadata embedded in every feed.
    pub site: SiteMetadata,
    /// Section identifiers whose items are included in the feeds.
    pub sections: Vec<String>,
    /// One entry per generated feed.
    pub feeds: Vec<FeedConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteMetadata {
                url: String::new(),
                name: String::new(),
                description: String::new(),
            },
            sections: Vec::new(),
            feeds: vec![FeedConfig::default()],
        }
    }
}

impl SiteConfig {
    /// Validate site metadata and every feed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.url.trim().is_empty() {
            return Err(ConfigError::Validation("site.url must not be empty".into()));
        }
        if self.site.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.name must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for feed in &self.feeds {
            feed.validate()?;
            if !seen.insert(feed.target_path.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate feeds.target_path: {}",
                    feed.target_path
                )));
            }
        }
        Ok(())
    }
}

/// Parse config from a TOML string, then validate.
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let config: SiteConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `feed.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Feed Configuration
# =========================
# Unknown keys will cause an error.

# Sections of the content tree whose items go into the feeds.
# A section missing from the content file contributes nothing.
sections = ["posts"]

# ---------------------------------------------------------------------------
# Site metadata (required)
# ---------------------------------------------------------------------------
[site]
# Canonical site URL. A trailing slash is added in the feed if missing.
url = "https://example.com"
name = "My Site"
description = ""

# ---------------------------------------------------------------------------
# Feeds
# ---------------------------------------------------------------------------
# One [[feeds]] table per output file. Target paths must be unique.
[[feeds]]
# Output path, relative to the output directory.
target_path = "feed.xml"

# Feed author name.
author = ""

# Maximum number of entries, newest first.
maximum_item_count = 100

# Advisory refresh interval in seconds.
ttl_interval = 0

# Layout of the XML: "none" for a single line, or { spaces = N } to
# pretty-print with N spaces per level.
indentation = "none"
"##
}
