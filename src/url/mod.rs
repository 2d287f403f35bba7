//! URL handling module for Shelf-Ripple
//!
//! Domain extraction, allow-list matching and the light normalization the
//! frontier uses to decide whether a page was already visited.

mod matcher;
mod normalize;

use url::Url;

pub use matcher::{is_allowed_domain, matches_wildcard};
pub use normalize::normalize_url;

/// Extracts the lowercase host from a URL
///
/// Returns `None` for URLs without a host (`data:`, `mailto:` and friends).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use shelf_ripple::url::extract_domain;
///
/// let url = Url::parse("https://WWW.Goodreads.com/search?q=x").unwrap();
/// assert_eq!(extract_domain(&url), Some("www.goodreads.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}
