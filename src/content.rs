//! The content tree: named sections holding items.
//!
//! Feed generation only reads items, through the [`ItemSource`] trait. The
//! concrete [`ContentTree`] is an in-memory map loaded from a JSON file shaped
//! like:
//!
//! ```json
//! {
//!   "sections": {
//!     "posts": [
//!       {
//!         "path": "posts/hello",
//!         "title": "Hello",
//!         "description": "First post",
//!         "content": "<p>Hi</p>",
//!         "date": "2024-01-01T00:00:00Z",
//!         "last_modified": "2024-01-01T00:00:00Z"
//!       }
//!     ]
//!   }
//! }
//! ```
//!
//! Item order within a section is preserved; it breaks ties between items
//! with the same date when the feed is sorted.

use crate::types::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read content file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid content file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// For [`ItemSource`] implementations backed by something that can fail
    /// to answer; the in-memory [`ContentTree`] never returns it.
    #[error("Section '{section}' could not be read: {reason}")]
    Section { section: String, reason: String },
    #[error("Item '{0}' was last modified before its publication date")]
    ModifiedBeforePublished(String),
}

/// Read access to the items of a named section.
///
/// A section that does not exist yields an empty slice. An `Err` means the
/// source itself could not be queried.
pub trait ItemSource {
    fn items(&self, section: &str) -> Result<&[Item], ContentError>;
}

/// In-memory content tree keyed by section identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentTree {
    #[serde(default)]
    pub sections: BTreeMap<String, Vec<Item>>,
}

impl ContentTree {
    /// Load a content tree from a JSON file and check item dates.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let tree: Self = serde_json::from_str(&content).map_err(|source| ContentError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tree.validate()?;
        Ok(tree)
    }

    /// Every item must have `last_modified >= date`.
    pub fn validate(&self) -> Result<(), ContentError> {
        if let Some(item) = self
            .sections
            .values()
            .flatten()
            .find(|item| item.last_modified < item.date)
        {
            return Err(ContentError::ModifiedBeforePublished(item.path.clone()));
        }
        Ok(())
    }

    /// Append an item to a section, creating the section if needed.
    pub fn insert(&mut self, section: &str, item: Item) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .push(item);
    }
}

impl ItemSource for ContentTree {
    fn items(&self, section: &str) -> Result<&[Item], ContentError> {
        Ok(self
            .sections
            .get(section)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }
}
