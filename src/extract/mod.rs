//! Record extraction from listing pages
//!
//! This module turns schema.org `Book` table rows into [`BookRecord`]s:
//! - Acceptance gate on the row's `itemtype`
//! - Fixed selector-to-field mapping
//! - Parsing of the compound rating text

mod book;
mod rating;

pub use book::{
    extract_book, extract_books, is_book_row, map_book_fields, BookFields, BookRecord,
    ExtractError, BOOK_ITEMTYPE, BOOK_ROW_SELECTOR,
};
pub use rating::{parse_ratings, RatingError, Ratings, MAX_AVG_RATING};
