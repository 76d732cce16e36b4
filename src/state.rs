//! Last-generation marker.
//!
//! The CLI records when a build last completed successfully, so the next run
//! can tell which items were modified since. This is deliberately a separate
//! file from the per-feed [`CacheRecord`](crate::cache::CacheRecord): the
//! marker belongs to the whole build, records belong to one feed each.
//!
//! Like cache records, the marker is read best-effort. A missing or
//! unreadable marker means "first run".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the marker file within the cache root.
const STATE_FILENAME: &str = "last-generation.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationState {
    pub last_generation: DateTime<Utc>,
}

impl GenerationState {
    /// Load the marker. Returns `None` if it doesn't exist or can't be parsed.
    pub fn load(cache_root: &Path) -> Option<Self> {
        let path = state_path(cache_root);
        let content = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "ignoring unreadable generation marker");
                None
            }
        }
    }

    /// Save the marker, creating the cache root if needed.
    pub fn save(&self, cache_root: &Path) -> io::Result<()> {
        fs::create_dir_all(cache_root)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(state_path(cache_root), json)
    }
}

/// Resolve the marker path for a cache root.
pub fn state_path(cache_root: &Path) -> PathBuf {
    cache_root.join(STATE_FILENAME)
}
