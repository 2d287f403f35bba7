//! Shelf-Ripple main entry point
//!
//! Crawls the configured search listing and writes one
//! `numRatings|avgRating|title` line per book to stdout.

use anyhow::Context;
use clap::Parser;
use shelf_ripple::config::{load_config_with_hash, validate, Config};
use shelf_ripple::crawler::Crawler;
use shelf_ripple::output::{print_statistics, LineWriter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Ripple: a book-rating listing crawler
///
/// Walks a book search listing page by page and prints the rating count,
/// average rating (times 100) and title of every book row. Without a
/// configuration file the built-in search, allow-list, depth and cache
/// directory are used.
#[derive(Parser, Debug)]
#[command(name = "shelf-ripple")]
#[command(version)]
#[command(about = "A book-rating listing crawler", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output, including the closing summary
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Always fetch over the network and do not write the cache
    #[arg(long)]
    no_cache: bool,

    /// Validate the configuration and show what would be crawled
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            let config = Config::default();
            validate(&config).context("validate built-in configuration")?;
            config
        }
    };

    if cli.no_cache {
        config.crawler.cache_dir = None;
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let stats = {
        let stdout = std::io::stdout();
        let mut sink = LineWriter::new(stdout.lock());
        let mut crawler = Crawler::new(config).context("initialize crawler")?;
        crawler.run(&mut sink).await.context("crawl failed")?
    };

    if !cli.quiet {
        print_statistics(&stats);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Diagnostics go to stderr; stdout is reserved for records.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_ripple=error"),
            1 => EnvFilter::new("shelf_ripple=info,warn"),
            2 => EnvFilter::new("shelf_ripple=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Shelf-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Allowed domains: {}", config.crawler.allowed_domains.join(", "));
    println!("  Max depth: {}", config.crawler.max_depth);
    println!(
        "  Cache dir: {}",
        config.crawler.cache_dir.as_deref().unwrap_or("(disabled)")
    );
    println!("  On record error: {:?}", config.crawler.on_record_error);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}
