//! Crawl statistics
//!
//! Counters kept by the crawl loop and the end-of-run summary printed from
//! them. The summary goes to stderr; stdout carries only records.

use std::fmt::Write as _;

/// Counters for a single crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched and dispatched (network or cache)
    pub pages_visited: u64,

    /// Pages served from the on-disk response cache
    pub pages_from_cache: u64,

    /// Pages that could not be fetched
    pub fetch_failures: u64,

    /// Records written to the sink
    pub records_emitted: u64,

    /// Book rows rejected because of missing or malformed ratings
    pub records_skipped: u64,

    /// "Next page" links accepted into the frontier
    pub links_followed: u64,
}

impl CrawlStats {
    /// Creates an empty set of counters
    pub fn new() -> Self {
        Self::default()
    }
}

/// Formats the end-of-run summary
pub fn format_statistics(stats: &CrawlStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Statistics ===");
    let _ = writeln!(
        out,
        "  Pages visited: {} ({} from cache)",
        stats.pages_visited, stats.pages_from_cache
    );
    let _ = writeln!(out, "  Fetch failures: {}", stats.fetch_failures);
    let _ = writeln!(out, "  Links followed: {}", stats.links_followed);
    let _ = writeln!(out, "  Records emitted: {}", stats.records_emitted);

    if stats.records_skipped > 0 {
        let _ = writeln!(
            out,
            "  Records skipped: {} (malformed or missing ratings)",
            stats.records_skipped
        );
    }

    out
}

/// Prints the end-of-run summary to stderr
pub fn print_statistics(stats: &CrawlStats) {
    eprint!("{}", format_statistics(stats));
}
