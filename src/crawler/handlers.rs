//! Listing page handlers
//!
//! - Seeding the frontier with the search URL
//! - Following "next page" pagination links
//! - Extracting and emitting book rows

use crate::config::ErrorPolicy;
use crate::crawler::dispatch::{ElementHandler, PageContext};
use crate::crawler::frontier::{LinkQueue, VisitError};
use crate::extract::{extract_book, BOOK_ROW_SELECTOR};
use crate::CrawlerError;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

/// `class` value marking the pagination link, compared for exact equality
pub const NEXT_PAGE_CLASS: &str = "next_page";

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Submits the seed URL at depth 1
///
/// Unlike discovered links, a rejected seed is reported: a crawl that cannot
/// start is a configuration error.
pub fn seed(queue: &mut dyn LinkQueue, seed_url: &str) -> Result<(), VisitError> {
    tracing::debug!("Seeding frontier with {}", seed_url);
    queue.visit(seed_url, 1)
}

/// Resolves an `href` against the page it was found on
///
/// Fragment-only and empty hrefs resolve to nothing.
pub fn resolve_href(page_url: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    page_url.join(href).ok()
}

/// Follows `<a class="next_page" href="...">` links
pub struct NextPageHandler;

impl ElementHandler for NextPageHandler {
    fn selector(&self) -> &Selector {
        &ANCHOR_SELECTOR
    }

    fn handle(&self, element: ElementRef<'_>, ctx: &mut PageContext<'_>) -> Result<(), CrawlerError> {
        if element.value().attr("class") != Some(NEXT_PAGE_CLASS) {
            return Ok(());
        }

        let Some(href) = element.value().attr("href") else {
            return Ok(());
        };

        let Some(next_url) = resolve_href(ctx.page_url, href) else {
            tracing::debug!("Ignoring unresolvable next-page href {:?}", href);
            return Ok(());
        };

        let text: String = element.text().collect();
        tracing::info!("Link found: {:?} -> {}", text.trim(), href);

        match ctx.frontier.visit(next_url.as_str(), ctx.depth + 1) {
            Ok(()) => ctx.stats.links_followed += 1,
            Err(e) => tracing::debug!("Not following {}: {}", next_url, e),
        }

        Ok(())
    }
}

/// Emits a record for every schema.org `Book` row
pub struct BookRowHandler;

impl ElementHandler for BookRowHandler {
    fn selector(&self) -> &Selector {
        &BOOK_ROW_SELECTOR
    }

    fn handle(&self, element: ElementRef<'_>, ctx: &mut PageContext<'_>) -> Result<(), CrawlerError> {
        match extract_book(&element) {
            Ok(Some(record)) => {
                tracing::debug!("Ratings text: {}", record.ratings_text);
                ctx.sink.emit(&record).map_err(CrawlerError::Output)?;
                ctx.stats.records_emitted += 1;
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(source) => match ctx.policy {
                ErrorPolicy::Skip => {
                    tracing::warn!("Skipping row on {}: {}", ctx.page_url, source);
                    ctx.stats.records_skipped += 1;
                    Ok(())
                }
                ErrorPolicy::Halt => Err(CrawlerError::Record {
                    url: ctx.page_url.to_string(),
                    source,
                }),
            },
        }
    }
}
