//! Book row extraction
//!
//! A listing page is a table whose book rows are tagged with
//! `itemtype="http://schema.org/Book"`. Each accepted row is mapped to a
//! [`BookRecord`] through a fixed set of selectors.

use crate::extract::rating::{parse_ratings, RatingError};
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// The `itemtype` value a row must carry, compared for exact equality
pub const BOOK_ITEMTYPE: &str = "http://schema.org/Book";

/// Candidate book rows; [`is_book_row`] decides which are accepted
pub static BOOK_ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr[itemtype]").expect("book row selector is valid"));

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.bookTitle span").expect("title selector is valid"));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("link selector is valid"));

static RATINGS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.minirating").expect("ratings selector is valid"));

/// Errors that reject a single book row
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("book row {title:?} has no ratings text")]
    MissingRatings { title: String },

    #[error("book row {title:?}: {source}")]
    Ratings {
        title: String,
        #[source]
        source: RatingError,
    },
}

/// Raw field values copied out of a book row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub detail_url: String,
    pub ratings_text: String,
}

/// One catalog entry extracted from a listing row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    /// Display title, empty when the row has no title element
    pub title: String,

    /// Link to the book's detail page as written in the row (may be relative)
    pub detail_url: String,

    /// The rating blob the two numeric fields were parsed from
    pub ratings_text: String,

    /// Average rating times 100, in `0..=500`
    pub avg_rating: u16,

    /// Number of ratings
    pub num_ratings: u16,
}

/// Renders the output line `numRatings|avgRating|title`
///
/// A `|` inside the title is written as-is.
impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.num_ratings, self.avg_rating, self.title)
    }
}

/// Returns true if the element is tagged as a schema.org `Book`
pub fn is_book_row(element: &ElementRef<'_>) -> bool {
    element.value().attr("itemtype") == Some(BOOK_ITEMTYPE)
}

/// Copies the title, detail link and rating text out of a row
///
/// Selectors that match nothing leave their field empty.
pub fn map_book_fields(element: &ElementRef<'_>) -> BookFields {
    let title = first_text(element, &TITLE_SELECTOR);

    let detail_url = element
        .select(&LINK_SELECTOR)
        .next()
        .and_then(|link| link.value().attr("href"))
        .unwrap_or_default()
        .to_string();

    let ratings_text = first_text(element, &RATINGS_SELECTOR);

    BookFields {
        title,
        detail_url,
        ratings_text,
    }
}

fn first_text(element: &ElementRef<'_>, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Extracts a book record from one row
///
/// # Returns
///
/// * `Ok(Some(BookRecord))` - The row is a book and its ratings parsed
/// * `Ok(None)` - The row is not a book row
/// * `Err(ExtractError)` - The row is a book but its ratings are missing or malformed
pub fn extract_book(element: &ElementRef<'_>) -> Result<Option<BookRecord>, ExtractError> {
    if !is_book_row(element) {
        return Ok(None);
    }

    let fields = map_book_fields(element);
    if fields.ratings_text.is_empty() {
        return Err(ExtractError::MissingRatings {
            title: fields.title,
        });
    }

    let ratings = parse_ratings(&fields.ratings_text).map_err(|source| ExtractError::Ratings {
        title: fields.title.clone(),
        source,
    })?;

    Ok(Some(BookRecord {
        title: fields.title,
        detail_url: fields.detail_url,
        ratings_text: fields.ratings_text,
        avg_rating: ratings.avg_rating,
        num_ratings: ratings.num_ratings,
    }))
}

/// Extracts every book row of a document, in document order
///
/// Non-book rows are dropped; rejected book rows are kept as errors.
pub fn extract_books(document: &Html) -> Vec<Result<BookRecord, ExtractError>> {
    document
        .select(&BOOK_ROW_SELECTOR)
        .filter_map(|row| extract_book(&row).transpose())
        .collect()
}
