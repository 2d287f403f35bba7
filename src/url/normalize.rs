use crate::UrlError;
use url::Url;

/// Parses a URL and strips its fragment
///
/// The frontier keys its visited set on the result, so `page?x=1#top` and
/// `page?x=1` count as the same page. Query strings are kept verbatim: the
/// listing encodes the page number and the search terms there.
///
/// # Examples
///
/// ```
/// use shelf_ripple::url::normalize_url;
///
/// let url = normalize_url("https://www.goodreads.com/search?page=2#results").unwrap();
/// assert_eq!(url.as_str(), "https://www.goodreads.com/search?page=2");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);
    Ok(url)
}
