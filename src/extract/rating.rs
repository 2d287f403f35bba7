//! Rating text parser
//!
//! Listing rows carry their rating as one natural-language blob, e.g.
//! `"4.05 avg rating — 1234 ratings"`. This module splits it into a
//! fixed-point average (two implied decimals) and a rating count.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Highest accepted fixed-point average (5.00 stars)
pub const MAX_AVG_RATING: u16 = 500;

/// `<D>.<DD> avg rating — <N> rating(s)`, em-dash separated, ASCII digits only.
static RATINGS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]\.[0-9]{2}) avg rating \x{2014} ([0-9]+) ratings?")
        .expect("ratings regex is valid") // Static pattern, safe to panic
});

/// Errors produced while parsing rating text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingError {
    #[error("malformed ratings text: {text:?}")]
    Malformed { text: String },

    #[error("average rating {value} exceeds {max}", max = MAX_AVG_RATING)]
    AverageOutOfRange { value: String },

    #[error("rating count {value} does not fit in 16 bits")]
    CountOutOfRange { value: String },
}

/// Average rating and rating count parsed from a listing row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratings {
    /// Average rating times 100 (`4.05` is stored as `405`)
    pub avg_rating: u16,

    /// Number of ratings
    pub num_ratings: u16,
}

/// Parses a compound rating string
///
/// The pattern is searched, not anchored, so surrounding text such as a
/// leading "really liked it" label is tolerated. Thousands separators in the
/// count are not: `"1,234 ratings"` is rejected as malformed.
///
/// # Examples
///
/// ```
/// use shelf_ripple::extract::parse_ratings;
///
/// let ratings = parse_ratings("4.05 avg rating — 1234 ratings").unwrap();
/// assert_eq!(ratings.avg_rating, 405);
/// assert_eq!(ratings.num_ratings, 1234);
/// ```
pub fn parse_ratings(text: &str) -> Result<Ratings, RatingError> {
    let captures = RATINGS_PATTERN
        .captures(text)
        .ok_or_else(|| RatingError::Malformed {
            text: text.to_string(),
        })?;

    let average = &captures[1];
    let count = &captures[2];

    let avg_rating = average
        .replacen('.', "", 1)
        .parse::<u16>()
        .ok()
        .filter(|value| *value <= MAX_AVG_RATING)
        .ok_or_else(|| RatingError::AverageOutOfRange {
            value: average.to_string(),
        })?;

    let num_ratings = count
        .parse::<u16>()
        .map_err(|_| RatingError::CountOutOfRange {
            value: count.to_string(),
        })?;

    Ok(Ratings {
        avg_rating,
        num_ratings,
    })
}
