/// Checks if a host matches a domain pattern
///
/// `"www.goodreads.com"` matches only that host. `"*.goodreads.com"` matches
/// the bare domain and any subdomain below it.
///
/// # Examples
///
/// ```
/// use shelf_ripple::url::matches_wildcard;
///
/// assert!(matches_wildcard("www.goodreads.com", "www.goodreads.com"));
/// assert!(!matches_wildcard("www.goodreads.com", "goodreads.com"));
/// assert!(matches_wildcard("*.goodreads.com", "goodreads.com"));
/// assert!(matches_wildcard("*.goodreads.com", "images.goodreads.com"));
/// ```
pub fn matches_wildcard(pattern: &str, candidate: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(base) => {
            candidate == base
                || candidate
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        None => candidate == pattern,
    }
}

/// Returns true if `host` matches any pattern of the allow-list
///
/// An empty allow-list permits every host.
pub fn is_allowed_domain<S: AsRef<str>>(host: &str, allowed: &[S]) -> bool {
    allowed.is_empty()
        || allowed
            .iter()
            .any(|pattern| matches_wildcard(pattern.as_ref(), host))
}
