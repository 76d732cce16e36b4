//! CLI output formatting for the `generate` and `check` commands.
//!
//! Each command has a `format_*` function returning lines (pure, testable)
//! and a `print_*` wrapper that writes them to stdout.
//!
//! ## Generate
//!
//! ```text
//! 001 feed.xml → dist/feed.xml
//!     rendered: 10 entries from 12 items
//! 002 blog/atom.xml → dist/blog/atom.xml
//!     cached: 12 entries from 12 items
//!
//! Cache: 1 cached, 1 rendered (2 total)
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 feed.xml (2 of 3 items)
//!     001 Newest post
//!         Path: posts/newest
//!         Published: 2024-03-01
//!     002 Older post
//!         Path: posts/older
//!         Published: 2024-02-01
//! ```

use crate::cache::CacheStats;
use crate::config::FeedConfig;
use crate::generate::{FeedReport, Generation};
use crate::types::Item;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn outcome_label(outcome: Generation) -> &'static str {
    match outcome {
        Generation::Reused => "cached",
        Generation::Rendered => "rendered",
    }
}

/// Lines summarizing one `generate` run.
pub fn format_generate_output(reports: &[FeedReport], stats: &CacheStats) -> Vec<String> {
    let mut lines = Vec::new();
    for (idx, report) in reports.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(idx + 1),
            report.target_path,
            report.output_path.display()
        ));
        lines.push(format!(
            "{}{}: {} entries from {} items",
            indent(1),
            outcome_label(report.outcome),
            report.entry_count,
            report.item_count
        ));
    }
    lines.push(String::new());
    lines.push(format!("Cache: {}", stats));
    lines
}

pub fn print_generate_output(reports: &[FeedReport], stats: &CacheStats) {
    for line in format_generate_output(reports, stats) {
        println!("{}", line);
    }
}

/// Lines listing the entries each feed would contain.
pub fn format_check_output(feeds: &[FeedConfig], items: &[Item]) -> Vec<String> {
    let mut lines = Vec::new();
    for (idx, feed) in feeds.iter().enumerate() {
        let entries = &items[..items.len().min(feed.maximum_item_count)];
        lines.push(format!(
            "{} {} ({} of {} items)",
            format_index(idx + 1),
            feed.target_path,
            entries.len(),
            items.len()
        ));
        for (pos, item) in entries.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(pos + 1), item.title));
            lines.push(format!("{}Path: {}", indent(2), item.path));
            lines.push(format!(
                "{}Published: {}",
                indent(2),
                item.date.format("%Y-%m-%d")
            ));
        }
    }
    lines
}

pub fn print_check_output(feeds: &[FeedConfig], items: &[Item]) {
    for line in format_check_output(feeds, items) {
        println!("{}", line);
    }
}
