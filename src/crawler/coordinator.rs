//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the driving loop that ties the crawl together:
//! - Seeding the frontier
//! - Fetching pages through the response cache
//! - Dispatching each parsed page to the element handlers
//! - Counting what happened for the end-of-run summary

use crate::config::{validate, Config};
use crate::crawler::cache::ResponseCache;
use crate::crawler::dispatch::{Dispatcher, PageContext};
use crate::crawler::fetcher::{build_http_client, FetchResult, PageFetcher};
use crate::crawler::frontier::{Frontier, QueuedUrl};
use crate::crawler::handlers::seed;
use crate::output::{CrawlStats, RecordSink};
use crate::CrawlerError;
use scraper::Html;
use url::Url;

/// Main crawler coordinator structure
pub struct Crawler {
    config: Config,
    fetcher: PageFetcher,
    frontier: Frontier,
    dispatcher: Dispatcher,
    stats: CrawlStats,
}

impl Crawler {
    /// Creates a crawler for the given configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to run
    /// * `Err(CrawlerError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, CrawlerError> {
        let client = build_http_client(&config.user_agent)?;
        let cache = config.crawler.cache_dir.as_deref().map(ResponseCache::new);

        match &cache {
            Some(cache) => tracing::info!("Caching responses in {}", cache.dir().display()),
            None => tracing::info!("Response cache disabled"),
        }

        Ok(Self {
            fetcher: PageFetcher::new(client, cache, config.crawler.allowed_domains.clone()),
            frontier: Frontier::from_config(&config.crawler),
            dispatcher: Dispatcher::default(),
            stats: CrawlStats::default(),
            config,
        })
    }

    /// Returns the counters collected so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Runs the crawl until the frontier is exhausted
    ///
    /// Records are emitted to `sink` as they are extracted. Fetch failures are
    /// logged and counted. The crawl ends early with an error when the seed is
    /// rejected, the sink fails, or a bad row is hit under the `halt` policy.
    pub async fn run(&mut self, sink: &mut dyn RecordSink) -> Result<CrawlStats, CrawlerError> {
        seed(&mut self.frontier, &self.config.crawler.seed_url)?;

        let start_time = std::time::Instant::now();

        while let Some(queued) = self.frontier.next_url() {
            tracing::info!("Visiting {}", queued.url);

            match self.fetcher.fetch(&queued.url).await {
                FetchResult::Success {
                    final_url,
                    body,
                    from_cache,
                    ..
                } => {
                    self.stats.pages_visited += 1;
                    if from_cache {
                        self.stats.pages_from_cache += 1;
                    }

                    let page_url = Url::parse(&final_url).unwrap_or_else(|_| queued.url.clone());
                    self.process_page(&queued, &page_url, &body, sink)?;
                }
                FetchResult::ContentMismatch { content_type } => {
                    self.stats.fetch_failures += 1;
                    tracing::warn!("Skipping {}: expected HTML, got {}", queued.url, content_type);
                }
                FetchResult::RedirectBlocked { target } => {
                    self.stats.fetch_failures += 1;
                    tracing::warn!("Skipping {}: redirect to disallowed {}", queued.url, target);
                }
                FetchResult::RedirectError { error } => {
                    self.stats.fetch_failures += 1;
                    tracing::warn!("Skipping {}: {}", queued.url, error);
                }
                FetchResult::HttpError { status_code } => {
                    self.stats.fetch_failures += 1;
                    tracing::warn!("Skipping {}: HTTP {}", queued.url, status_code);
                }
                FetchResult::NetworkError { error } => {
                    self.stats.fetch_failures += 1;
                    tracing::warn!("Skipping {}: {}", queued.url, error);
                }
            }

            if self.stats.pages_visited > 0 && self.stats.pages_visited % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} in frontier, {} records",
                    self.stats.pages_visited,
                    self.frontier.len(),
                    self.stats.records_emitted
                );
            }
        }

        tracing::info!(
            "Crawl completed: {} pages visited in {:?}",
            self.stats.pages_visited,
            start_time.elapsed()
        );

        Ok(self.stats.clone())
    }

    /// Parses one page and runs the handlers against it
    fn process_page(
        &mut self,
        queued: &QueuedUrl,
        page_url: &Url,
        body: &str,
        sink: &mut dyn RecordSink,
    ) -> Result<(), CrawlerError> {
        let document = Html::parse_document(body);
        let mut ctx = PageContext {
            page_url,
            depth: queued.depth,
            frontier: &mut self.frontier,
            sink,
            policy: self.config.crawler.on_record_error,
            stats: &mut self.stats,
        };
        self.dispatcher.dispatch(&document, &mut ctx)
    }
}

/// Validates the configuration and runs a complete crawl with it
///
/// # Example
///
/// ```no_run
/// use shelf_ripple::config::Config;
/// use shelf_ripple::crawler::run_crawl;
/// use shelf_ripple::output::LineWriter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut sink = LineWriter::new(std::io::stdout());
/// let stats = run_crawl(Config::default(), &mut sink).await?;
/// eprintln!("{} records", stats.records_emitted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    sink: &mut dyn RecordSink,
) -> Result<CrawlStats, CrawlerError> {
    validate(&config)?;
    let mut crawler = Crawler::new(config)?;
    crawler.run(sink).await
}
