//! Crawler module for listing traversal
//!
//! This module contains the crawl machinery, including:
//! - The frontier with its allow-list and depth bound
//! - HTTP fetching behind an on-disk response cache, with redirects held
//!   to the allow-list
//! - Per-page dispatch of element handlers
//! - Pagination and book-row handlers
//! - Overall crawl coordination

mod cache;
mod coordinator;
mod dispatch;
mod fetcher;
mod frontier;
mod handlers;

pub use cache::{CachedPage, ResponseCache};
pub use coordinator::{run_crawl, Crawler};
pub use dispatch::{Dispatcher, ElementHandler, PageContext};
pub use fetcher::{
    build_http_client, fetch_url, redirect_allowed, FetchResult, PageFetcher, MAX_REDIRECTS,
};
pub use frontier::{Frontier, LinkQueue, QueuedUrl, VisitError};
pub use handlers::{resolve_href, seed, BookRowHandler, NextPageHandler, NEXT_PAGE_CLASS};
