use chrono::Utc;
use clap::{Parser, Subcommand};
use simple_feed::cache::CacheStats;
use simple_feed::collect::collect_items;
use simple_feed::content::ContentTree;
use simple_feed::generate::{FeedGenerator, FileLayout, Generation, GenerationContext};
use simple_feed::state::GenerationState;
use simple_feed::{config, output};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Flags for commands that may reuse cached feeds.
#[derive(clap::Args, Clone)]
struct CacheArgs {
    /// Ignore the last generation date, forcing every feed to re-render
    #[arg(long)]
    no_cache: bool,
}

#[derive(Parser)]
#[command(name = "simple-feed")]
#[command(about = "Change-aware Atom feed generator")]
#[command(long_about = "\
Change-aware Atom feed generator

Reads site metadata and feed definitions from a TOML config and items from
a JSON content file, then writes one Atom feed per [[feeds]] table. A feed
is only re-rendered when its config, its item count, or an item's
modification time changed since the last successful build.

Run 'simple-feed gen-config' to generate a documented feed.toml.")]
#[command(version)]
struct Cli {
    /// Site config file
    #[arg(long, default_value = "feed.toml", global = true)]
    config: PathBuf,

    /// Content file: sections mapped to items
    #[arg(long, default_value = "content.json", global = true)]
    content: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for feed cache records and the last-generation marker
    #[arg(long, default_value = ".simple-feed-cache", global = true)]
    cache_dir: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate every configured feed
    Generate(CacheArgs),
    /// Validate config and content, and list each feed's entries
    Check,
    /// Print a stock feed.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(cache_args) => {
            let site_config = config::load_config(&cli.config)?;
            let tree = ContentTree::load(&cli.content)?;
            let sections: BTreeSet<String> = site_config.sections.iter().cloned().collect();
            let layout = FileLayout::new(&cli.output, &cli.cache_dir);

            let last_generation_date = if cache_args.no_cache {
                None
            } else {
                GenerationState::load(&cli.cache_dir).map(|s| s.last_generation)
            };
            let context = GenerationContext {
                sections: &sections,
                source: &tree,
                site: &site_config.site,
                last_generation_date,
                layout: &layout,
            };

            let build_time = Utc::now();
            let generator = FeedGenerator::new();
            let mut stats = CacheStats::default();
            let mut reports = Vec::with_capacity(site_config.feeds.len());
            for feed in &site_config.feeds {
                let report = generator.generate(feed, &context, build_time)?;
                match report.outcome {
                    Generation::Reused => stats.reuse(),
                    Generation::Rendered => stats.render(),
                }
                reports.push(report);
            }

            GenerationState {
                last_generation: build_time,
            }
            .save(&cli.cache_dir)?;
            output::print_generate_output(&reports, &stats);
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let site_config = config::load_config(&cli.config)?;
            let tree = ContentTree::load(&cli.content)?;
            let sections: BTreeSet<String> = site_config.sections.iter().cloned().collect();
            let items = collect_items(&sections, &tree)?;
            output::print_check_output(&site_config.feeds, &items);
            println!("==> Config and content are valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` directives are honored on top
/// of the level chosen by `-v`.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
