//! Rendered-feed cache for incremental builds.
//!
//! Each feed target keeps one [`CacheRecord`]: the configuration it was
//! rendered with, the rendered text, and how many items were collected at
//! the time. The generator uses it to decide whether the previous output can
//! be written again verbatim (see [`crate::generate`] for the validity rule).
//!
//! ## Storage
//!
//! Records are JSON files in the cache root named
//! `feed-<key>.json`, where `<key>` is a SHA-256 prefix of the feed's target
//! path. Feeds with different targets never share a record.
//!
//! ## Reading is best-effort
//!
//! A missing file, unparsable JSON, or a record from a different format
//! version all load as `None`. Only writing a record can fail.

use crate::config::FeedConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Fixed prefix of every feed cache file.
const CACHE_NAME: &str = "feed";

/// Version of the cache record format. Bump this to invalidate all
/// existing records when the format changes.
const RECORD_VERSION: u32 = 1;

/// Hex characters of the target-path digest used in file names.
const KEY_LEN: usize = 16;

/// The last successful render of one feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub version: u32,
    pub config: FeedConfig,
    /// Serialized feed exactly as it was written to the output file.
    pub feed: String,
    /// Number of collected items, before truncation.
    pub item_count: usize,
}

impl CacheRecord {
    pub fn new(config: FeedConfig, feed: String, item_count: usize) -> Self {
        Self {
            version: RECORD_VERSION,
            config,
            feed,
            item_count,
        }
    }

    /// Load a record. Returns `None` if the file doesn't exist or can't be
    /// decoded (corruption, version mismatch).
    pub fn load(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no readable feed cache");
                return None;
            }
        };
        let record: Self = match serde_json::from_str(&content) {
            Ok(r) => r,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "discarding undecodable feed cache");
                return None;
            }
        };
        if record.version != RECORD_VERSION {
            debug!(
                path = %path.display(),
                found = record.version,
                expected = RECORD_VERSION,
                "discarding feed cache from another format version"
            );
            return None;
        }
        Some(record)
    }

    /// Write the record, creating the cache directory if needed.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        fs::write(path, json)
    }
}

/// Cache key for a feed target: a short SHA-256 hex digest of the path.
pub fn cache_key(target_path: &str) -> String {
    let digest = Sha256::digest(target_path.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(KEY_LEN);
    hex
}

/// Resolve the cache record path for a feed target.
pub fn record_path(cache_root: &Path, target_path: &str) -> PathBuf {
    cache_root.join(format!("{}-{}.json", CACHE_NAME, cache_key(target_path)))
}

/// Summary of cache use across the feeds of one build.
#[derive(Debug, Default)]
pub struct CacheStats {
    pub reused: u32,
    pub rendered: u32,
}

impl CacheStats {
    pub fn reuse(&mut self) {
        self.reused += 1;
    }

    pub fn render(&mut self) {
        self.rendered += 1;
    }

    pub fn total(&self) -> u32 {
        self.reused + self.rendered
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reused > 0 {
            write!(
                f,
                "{} cached, {} rendered ({} total)",
                self.reused,
                self.rendered,
                self.total()
            )
        } else {
            write!(f, "{} rendered", self.rendered)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Indentation;
    use tempfile::TempDir;

    fn record() -> CacheRecord {
        CacheRecord::new(FeedConfig::default(), "<feed/>".into(), 3)
    }

    // =========================================================================
    // Save / Load
    // =========================================================================

    #[test]
    fn save_and_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = record_path(tmp.path(), "feed.xml");
        let mut original = record();
        original.config.indentation = Indentation::Spaces(2);
        original.save(&path).unwrap();

        assert_eq!(CacheRecord::load(&path), Some(original));
    }

    #[test]
    fn save_creates_cache_dir() {
        let tmp = TempDir::new().unwrap();
        let path = record_path(&tmp.path().join("nested/cache"), "feed.xml");
        record().save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn load_missing_file_returns_none() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(CacheRecord::load(&tmp.path().join("absent.json")), None);
    }

    #[test]
    fn load_corrupt_json_returns_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(CacheRecord::load(&path), None);
    }

    #[test]
    fn load_wrong_schema_returns_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.json");
        fs::write(&path, r#"{"version": 1, "feed": "x"}"#).unwrap();
        assert_eq!(CacheRecord::load(&path), None);
    }

    #[test]
    fn load_wrong_version_returns_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("feed.json");
        let mut stale = record();
        stale.version = RECORD_VERSION + 1;
        fs::write(&path, serde_json::to_string(&stale).unwrap()).unwrap();
        assert_eq!(CacheRecord::load(&path), None);
    }

    #[test]
    fn save_into_file_as_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("cache");
        fs::write(&blocker, "a file, not a dir").unwrap();
        assert!(record().save(&blocker.join("feed.json")).is_err());
    }

    // =========================================================================
    // Keys
    // =========================================================================

    #[test]
    fn cache_key_is_stable_and_short() {
        assert_eq!(cache_key("feed.xml"), cache_key("feed.xml"));
        assert_eq!(cache_key("feed.xml").len(), KEY_LEN);
    }

    #[test]
    fn different_targets_get_different_files() {
        let root = Path::new("/cache");
        assert_ne!(
            record_path(root, "feed.xml"),
            record_path(root, "blog/feed.xml")
        );
        assert_ne!(record_path(root, "a/b.xml"), record_path(root, "a-b.xml"));
    }

    #[test]
    fn record_path_uses_feed_prefix() {
        let path = record_path(Path::new("/cache"), "feed.xml");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("feed-"));
        assert!(name.ends_with(".json"));
    }

    // =========================================================================
    // CacheStats
    // =========================================================================

    #[test]
    fn cache_stats_display_with_reuse() {
        let mut s = CacheStats::default();
        s.reuse();
        s.reuse();
        s.render();
        assert_eq!(format!("{}", s), "2 cached, 1 rendered (3 total)");
    }

    #[test]
    fn cache_stats_display_no_reuse() {
        let mut s = CacheStats::default();
        s.render();
        assert_eq!(format!("{}", s), "1 rendered");
    }
}
