//! Output module for emitting extracted records
//!
//! This module handles:
//! - Streaming book records as pipe-delimited lines
//! - Collecting and reporting crawl statistics

mod sink;
pub mod stats;

pub use sink::{LineWriter, RecordSink};
pub use stats::{format_statistics, print_statistics, CrawlStats};
