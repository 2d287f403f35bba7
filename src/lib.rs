//! Shelf-Ripple: a book-rating listing crawler
//!
//! This crate walks a search-result listing on a book-cataloging site, pulls the
//! rating data out of every schema.org `Book` row and follows "next page" links
//! until the frontier is exhausted or the depth bound is reached.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Shelf-Ripple operations
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Seed URL rejected: {0}")]
    Seed(#[from] crawler::VisitError),

    #[error("Record extraction failed on {url}: {source}")]
    Record {
        url: String,
        source: extract::ExtractError,
    },

    #[error("Failed to write record: {0}")]
    Output(#[source] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

// Re-export commonly used types
pub use config::Config;
pub use extract::{parse_ratings, BookRecord, Ratings};
pub use output::{CrawlStats, RecordSink};
pub use crate::url::{extract_domain, is_allowed_domain, normalize_url};
