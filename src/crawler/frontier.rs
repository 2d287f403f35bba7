//! Crawl frontier
//!
//! This module handles:
//! - The FIFO queue of pages still to fetch
//! - The visited set, so each listing page is fetched once
//! - Domain allow-listing and the depth bound, applied on every visit

use crate::config::CrawlerConfig;
use crate::url::{extract_domain, is_allowed_domain, normalize_url};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use url::Url;

/// Reasons a URL is refused by the frontier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisitError {
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("domain {domain} is not in the allow-list")]
    DomainNotAllowed { domain: String },

    #[error("{url} at depth {depth} exceeds max depth {max_depth}")]
    DepthExceeded {
        url: String,
        depth: u32,
        max_depth: u32,
    },

    #[error("{url} was already visited")]
    AlreadyVisited { url: String },
}

/// The `visit` primitive handlers use to queue newly discovered pages
///
/// Callers inside the crawl treat a rejection as "not followed"; the error is
/// returned so tests and the seed step can inspect it.
pub trait LinkQueue {
    /// Queues an absolute URL found at `depth` (the seed is depth 1)
    fn visit(&mut self, url: &str, depth: u32) -> Result<(), VisitError>;
}

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The URL to fetch, fragment removed
    pub url: Url,

    /// Link hops from the seed, counting the seed as 1
    pub depth: u32,
}

/// Pending and visited pages of one crawl
pub struct Frontier {
    /// Pages to fetch, oldest first
    queue: VecDeque<QueuedUrl>,

    /// Every URL ever accepted, so none is fetched twice
    seen: HashSet<String>,

    /// Host patterns a URL must match
    allowed_domains: Vec<String>,

    /// Deepest page accepted; 0 means unbounded
    max_depth: u32,
}

impl Frontier {
    /// Creates an empty frontier with the given policies
    pub fn new(allowed_domains: Vec<String>, max_depth: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            seen: HashSet::new(),
            allowed_domains,
            max_depth,
        }
    }

    /// Creates an empty frontier from the crawler configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self::new(config.allowed_domains.clone(), config.max_depth)
    }

    /// Takes the next URL to fetch
    pub fn next_url(&mut self) -> Option<QueuedUrl> {
        self.queue.pop_front()
    }

    /// Returns the number of URLs waiting to be fetched
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether nothing is waiting to be fetched
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of distinct URLs ever accepted
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

impl LinkQueue for Frontier {
    fn visit(&mut self, url: &str, depth: u32) -> Result<(), VisitError> {
        if self.max_depth > 0 && depth > self.max_depth {
            return Err(VisitError::DepthExceeded {
                url: url.to_string(),
                depth,
                max_depth: self.max_depth,
            });
        }

        let normalized = normalize_url(url).map_err(|e| VisitError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let domain = extract_domain(&normalized).unwrap_or_default();
        if !is_allowed_domain(&domain, &self.allowed_domains) {
            return Err(VisitError::DomainNotAllowed { domain });
        }

        if !self.seen.insert(normalized.as_str().to_string()) {
            return Err(VisitError::AlreadyVisited {
                url: normalized.to_string(),
            });
        }

        tracing::trace!("Queued {} at depth {}", normalized, depth);
        self.queue.push_back(QueuedUrl {
            url: normalized,
            depth,
        });

        Ok(())
    }
}
