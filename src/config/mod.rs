//! Configuration module for Shelf-Ripple
//!
//! The crawler runs without any configuration file: [`Config::default`] holds
//! the built-in seed, allow-list, depth bound and cache directory. A TOML file
//! can override any of them.
//!
//! # Example
//!
//! ```no_run
//! use shelf_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shelf-ripple.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ErrorPolicy, UserAgentConfig, DEFAULT_ALLOWED_DOMAIN,
    DEFAULT_CACHE_DIR, DEFAULT_MAX_DEPTH, DEFAULT_SEED_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
