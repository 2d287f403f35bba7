//! Per-page element dispatch
//!
//! A [`Dispatcher`] holds an ordered list of element handlers. For every
//! fetched page each handler runs in registration order, once per element
//! its selector matches, in document order.

use crate::config::ErrorPolicy;
use crate::crawler::frontier::LinkQueue;
use crate::crawler::handlers::{BookRowHandler, NextPageHandler};
use crate::output::{CrawlStats, RecordSink};
use crate::CrawlerError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Everything a handler may touch while processing one page
pub struct PageContext<'a> {
    /// URL the page was fetched from, used to resolve relative links
    pub page_url: &'a Url,

    /// Depth of the page (seed = 1)
    pub depth: u32,

    /// Where discovered links are queued
    pub frontier: &'a mut dyn LinkQueue,

    /// Where extracted records are emitted
    pub sink: &'a mut dyn RecordSink,

    /// Handling of rejected book rows
    pub policy: ErrorPolicy,

    /// Counters for the run
    pub stats: &'a mut CrawlStats,
}

/// A (selector, callback) pair run against every fetched page
pub trait ElementHandler {
    /// Elements this handler is invoked for
    fn selector(&self) -> &Selector;

    /// Processes one matching element
    ///
    /// Returning an error aborts the crawl.
    fn handle(&self, element: ElementRef<'_>, ctx: &mut PageContext<'_>) -> Result<(), CrawlerError>;
}

/// Ordered list of element handlers
pub struct Dispatcher {
    handlers: Vec<Box<dyn ElementHandler>>,
}

impl Dispatcher {
    /// Creates a dispatcher with no handlers
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Appends a handler; handlers run in the order they were added
    pub fn with_handler(mut self, handler: impl ElementHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Returns the number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs every handler against a parsed document
    pub fn dispatch(&self, document: &Html, ctx: &mut PageContext<'_>) -> Result<(), CrawlerError> {
        for handler in &self.handlers {
            for element in document.select(handler.selector()) {
                handler.handle(element, ctx)?;
            }
        }
        Ok(())
    }

    /// Parses raw HTML and runs every handler against it
    pub fn dispatch_html(&self, html: &str, ctx: &mut PageContext<'_>) -> Result<(), CrawlerError> {
        let document = Html::parse_document(html);
        self.dispatch(&document, ctx)
    }
}

/// The listing crawl: book rows first, then "next page" links
impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
            .with_handler(BookRowHandler)
            .with_handler(NextPageHandler)
    }
}
