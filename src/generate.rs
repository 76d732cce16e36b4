//! Feed generation with cache reuse.
//!
//! [`FeedGenerator::generate`] runs one feed through these steps:
//!
//! 1. Resolve the output path and the feed's cache record path.
//! 2. Collect items from the included sections (always, even when the cached
//!    feed ends up reused: the item count and modification times are inputs
//!    to the validity check).
//! 3. Load the previous [`CacheRecord`], if any. Read failures are a miss.
//! 4. Reuse the cached text if it is still valid, otherwise render, persist a
//!    new record, and write the fresh text.
//!
//! ## Cache Validity
//!
//! The cached feed is reused only when all of these hold:
//!
//! - a previous generation date is known (never on a first run),
//! - a record was decoded,
//! - the record's [`FeedConfig`] equals the current one, field for field,
//! - the record's item count equals the number of collected items,
//! - no collected item was modified strictly after the last generation.
//!
//! The count check is a proxy for "the item set changed". It does not catch
//! one item being swapped for another with the same total, unless the new
//! item's modification time is also newer than the last generation.
//!
//! Site metadata (URL, name, description) is not part of the check either.
//! Editing it without touching the feed config or any item reuses a feed
//! that still carries the old values; run with a fresh cache after such edits.
//!
//! ## Failures
//!
//! Content, render, cache-write, and output errors are returned as distinct
//! [`GenerateError`] variants carrying the path involved. The cache record is
//! written before the output, so an output failure can leave a record whose
//! text never reached the output file; the next run with a known generation
//! date would then reuse it.
//!
//! Output is written to a temp file next to the target and renamed over it,
//! so a failed write never leaves a truncated feed behind.

use crate::cache::{self, CacheRecord};
use crate::collect::collect_items;
use crate::config::FeedConfig;
use crate::content::{ContentError, ItemSource};
use crate::render::{AtomRenderer, FeedRenderer, RenderError, RenderInput};
use crate::types::{Item, SiteMetadata};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("Failed to create output file {path}: {source}")]
    OutputCreate { path: PathBuf, source: io::Error },
    #[error("Failed to write output file {path}: {source}")]
    OutputWrite { path: PathBuf, source: io::Error },
    #[error("Failed to write feed cache {path}: {source}")]
    CacheWrite { path: PathBuf, source: io::Error },
}

/// Where feeds and cache records are written.
#[derive(Debug, Clone)]
pub struct FileLayout {
    pub output_root: PathBuf,
    pub cache_root: PathBuf,
}

impl FileLayout {
    pub fn new(output_root: impl Into<PathBuf>, cache_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            cache_root: cache_root.into(),
        }
    }

    pub fn output_path(&self, target_path: &str) -> PathBuf {
        self.output_root.join(target_path)
    }

    pub fn cache_path(&self, target_path: &str) -> PathBuf {
        cache::record_path(&self.cache_root, target_path)
    }
}

/// Inputs shared by every feed of one build.
#[derive(Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Sections whose items are included.
    pub sections: &'a BTreeSet<String>,
    pub source: &'a dyn ItemSource,
    pub site: &'a SiteMetadata,
    /// When the previous successful generation ran. `None` on a first run.
    pub last_generation_date: Option<DateTime<Utc>>,
    pub layout: &'a FileLayout,
}

/// Whether the output came from the cache or a fresh render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Reused,
    Rendered,
}

/// Result of generating one feed.
#[derive(Debug, Clone)]
pub struct FeedReport {
    pub outcome: Generation,
    pub target_path: String,
    pub output_path: PathBuf,
    /// Items collected before truncation.
    pub item_count: usize,
    /// Entries in the written feed.
    pub entry_count: usize,
}

/// Generates feeds, reusing the previous output when nothing changed.
#[derive(Debug, Default)]
pub struct FeedGenerator<R = AtomRenderer> {
    renderer: R,
}

impl FeedGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: FeedRenderer> FeedGenerator<R> {
    pub fn with_renderer(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Generate the feed described by `config`, stamping it with `build_time`.
    pub fn generate(
        &self,
        config: &FeedConfig,
        context: &GenerationContext<'_>,
        build_time: DateTime<Utc>,
    ) -> Result<FeedReport, GenerateError> {
        let output_path = context.layout.output_path(&config.target_path);
        let cache_path = context.layout.cache_path(&config.target_path);

        let items = collect_items(context.sections, context.source)?;
        let old_record = CacheRecord::load(&cache_path);

        let mut report = FeedReport {
            outcome: Generation::Reused,
            target_path: config.target_path.clone(),
            output_path,
            item_count: items.len(),
            entry_count: items.len().min(config.maximum_item_count),
        };

        if let Some(record) = old_record.filter(|record| {
            cache_is_valid(record, config, &items, context.last_generation_date)
        }) {
            write_output(&report.output_path, &record.feed)?;
            info!(feed = %config.target_path, items = items.len(), "reused cached feed");
            return Ok(report);
        }

        let feed = self.renderer.render(&RenderInput {
            items: &items,
            config,
            site: context.site,
            build_time,
        })?;

        let record = CacheRecord::new(config.clone(), feed, items.len());
        record
            .save(&cache_path)
            .map_err(|source| GenerateError::CacheWrite {
                path: cache_path,
                source,
            })?;
        write_output(&report.output_path, &record.feed)?;

        report.outcome = Generation::Rendered;
        info!(
            feed = %config.target_path,
            items = report.item_count,
            entries = report.entry_count,
            "rendered feed"
        );
        Ok(report)
    }
}

/// Decide whether a cached record may be written again verbatim.
pub fn cache_is_valid(
    record: &CacheRecord,
    config: &FeedConfig,
    items: &[Item],
    last_generation_date: Option<DateTime<Utc>>,
) -> bool {
    let Some(last_generation) = last_generation_date else {
        debug!(feed = %config.target_path, "first generation, not reusing cache");
        return false;
    };
    if record.config != *config {
        debug!(feed = %config.target_path, "feed config changed");
        return false;
    }
    if record.item_count != items.len() {
        debug!(
            feed = %config.target_path,
            cached = record.item_count,
            current = items.len(),
            "item count changed"
        );
        return false;
    }
    if let Some(item) = items.iter().find(|i| i.last_modified > last_generation) {
        debug!(feed = %config.target_path, item = %item.path, "item modified since last generation");
        return false;
    }
    true
}

fn write_output(path: &Path, text: &str) -> Result<(), GenerateError> {
    replace_output(path, |file| file.write_all(text.as_bytes()))
}

/// Write a sibling temp file, then rename it over `path`. A failed write
/// leaves any existing output untouched.
fn replace_output(
    path: &Path,
    write: impl FnOnce(&mut File) -> io::Result<()>,
) -> Result<(), GenerateError> {
    let create_err = |source| GenerateError::OutputCreate {
        path: path.to_path_buf(),
        source,
    };
    let write_err = |source| GenerateError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(create_err)?;
    let mut tmp = NamedTempFile::new_in(parent).map_err(create_err)?;
    write(tmp.as_file_mut()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
