//! # Simple Feed
//!
//! A change-aware Atom feed generator for static sites. It collects items from
//! named sections of a content tree, renders them newest first into an Atom
//! document, and writes the result, skipping the render entirely when nothing
//! relevant changed since the last build.
//!
//! # Pipeline
//!
//! ```text
//! content tree ─→ collect ─→ cache check ─┬─→ reuse cached text ─────────────┐
//!                                         └─→ render ─→ persist record ───────┴─→ output file
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`generate`] | Orchestration: cache validity, render-or-reuse, file writes |
//! | [`render`] | Atom document assembly and serialization |
//! | [`collect`] | Gathers and orders items from the included sections |
//! | [`cache`] | Per-feed cache records and their on-disk location |
//! | [`state`] | Last-generation marker shared by all feeds of a build |
//! | [`content`] | The [`ItemSource`](content::ItemSource) seam and a JSON-backed content tree |
//! | [`config`] | `FeedConfig` and `feed.toml` loading and validation |
//! | [`types`] | Shared `Item` and `SiteMetadata` types |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Reuse Means Byte-Identical
//!
//! A reused feed is the exact text of the last render. Rendering is a pure
//! function of items, config, site metadata and build time, so a reuse is
//! indistinguishable from re-rendering the same inputs at the previous build
//! time.
//!
//! ## Coarse Invalidation
//!
//! The cache is invalidated by config changes, a change in the number of
//! collected items, or any item modified after the last generation. It does
//! not hash item content, so swapping one item for another with an old
//! modification time keeps the cached feed.
//!
//! Site metadata is not part of the check. Changing the site URL, name or
//! description in `feed.toml` while items and feed config stay the same
//! reuses the old feed; pass `--no-cache` to `generate` after such edits.
//!
//! ## Canonical URLs
//!
//! Every URL in the feed (site, self link, entry ids and links) ends in `/`.

pub mod cache;
pub mod collect;
pub mod config;
pub mod content;
pub mod generate;
pub mod output;
pub mod render;
pub mod state;
pub mod types;

pub use config::{FeedConfig, Indentation};
pub use content::{ContentTree, ItemSource};
pub use generate::{FeedGenerator, FeedReport, FileLayout, Generation, GenerationContext};
pub use render::{AtomRenderer, FeedRenderer};
pub use types::{Item, SiteMetadata};

#[cfg(test)]
pub(crate) mod test_helpers;
