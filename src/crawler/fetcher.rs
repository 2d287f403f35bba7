//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent
//! - GET requests for listing pages
//! - Redirect handling within the domain allow-list
//! - Serving and filling the on-disk response cache
//! - Error classification

use crate::config::UserAgentConfig;
use crate::crawler::cache::{CachedPage, ResponseCache};
use crate::url::{extract_domain, is_allowed_domain};
use reqwest::{header, redirect::Policy, Client, StatusCode};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

/// Longest redirect chain followed for one request
pub const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code (200 for cache hits)
        status_code: u16,
        /// Page body content
        body: String,
        /// Whether the body came from the response cache
        from_cache: bool,
    },

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// A redirect pointed outside the allowed domains
    RedirectBlocked {
        /// Where the redirect pointed
        target: String,
    },

    /// Redirect error (loop, too many hops, bad Location)
    RedirectError {
        /// Error description
        error: String,
    },

    /// Non-success HTTP status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed by the client; `fetch_url` follows them itself
/// so every hop can be checked against the allow-list.
///
/// # Example
///
/// ```no_run
/// use shelf_ripple::config::UserAgentConfig;
/// use shelf_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns whether a redirect may be followed to `target`
///
/// The target must be http(s) and its host must pass the allow-list.
pub fn redirect_allowed(target: &Url, allowed_domains: &[String]) -> bool {
    if !matches!(target.scheme(), "http" | "https") {
        return false;
    }
    match extract_domain(target) {
        Some(domain) => is_allowed_domain(&domain, allowed_domains),
        None => false,
    }
}

/// Fetches a URL over the network
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with `text/html` | Success |
/// | 2xx with other Content-Type | ContentMismatch |
/// | 3xx to a host outside `allowed_domains` | RedirectBlocked |
/// | Redirect loop, more than `MAX_REDIRECTS` hops, bad Location | RedirectError |
/// | Any other status | HttpError |
/// | Timeout, refused connection, body read failure | NetworkError |
pub async fn fetch_url(client: &Client, url: &Url, allowed_domains: &[String]) -> FetchResult {
    let mut current = url.clone();
    let mut visited = HashSet::from([current.to_string()]);

    loop {
        let response = match client.get(current.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    "Connection refused".to_string()
                } else {
                    e.to_string()
                };
                return FetchResult::NetworkError { error };
            }
        };

        let status = response.status();

        if status.is_redirection() {
            let Some(location) = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
            else {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            };

            let target = match current.join(location) {
                Ok(target) => target,
                Err(e) => {
                    return FetchResult::RedirectError {
                        error: format!("Invalid Location {:?}: {}", location, e),
                    }
                }
            };

            if !redirect_allowed(&target, allowed_domains) {
                return FetchResult::RedirectBlocked {
                    target: target.to_string(),
                };
            }

            if visited.len() > MAX_REDIRECTS {
                return FetchResult::RedirectError {
                    error: format!("More than {} redirects", MAX_REDIRECTS),
                };
            }

            if !visited.insert(target.to_string()) {
                return FetchResult::RedirectError {
                    error: format!("Redirect loop at {}", target),
                };
            }

            tracing::debug!("Following redirect {} -> {}", current, target);
            current = target;
            continue;
        }

        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("text/html") {
            return FetchResult::ContentMismatch { content_type };
        }

        return match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url: current.to_string(),
                status_code: status.as_u16(),
                body,
                from_cache: false,
            },
            Err(e) => FetchResult::NetworkError {
                error: e.to_string(),
            },
        };
    }
}

/// Fetches pages through an optional response cache
pub struct PageFetcher {
    client: Client,
    cache: Option<ResponseCache>,
    allowed_domains: Vec<String>,
}

impl PageFetcher {
    /// Creates a fetcher; `cache` of `None` always goes to the network
    ///
    /// Redirects are only followed to hosts matching `allowed_domains`.
    pub fn new(client: Client, cache: Option<ResponseCache>, allowed_domains: Vec<String>) -> Self {
        Self {
            client,
            cache,
            allowed_domains,
        }
    }

    /// Fetches a page, preferring a cached body
    ///
    /// Only successful HTML responses are written back to the cache, together
    /// with the URL they were served from. A cache write failure is logged and
    /// otherwise ignored.
    pub async fn fetch(&self, url: &Url) -> FetchResult {
        if let Some(cache) = &self.cache {
            if let Some(page) = cache.get(url.as_str()).await {
                return FetchResult::Success {
                    final_url: page.final_url,
                    status_code: StatusCode::OK.as_u16(),
                    body: page.body,
                    from_cache: true,
                };
            }
        }

        let result = fetch_url(&self.client, url, &self.allowed_domains).await;

        if let (
            Some(cache),
            FetchResult::Success {
                final_url, body, ..
            },
        ) = (&self.cache, &result)
        {
            let page = CachedPage {
                final_url: final_url.clone(),
                body: body.clone(),
            };
            if let Err(e) = cache.put(url.as_str(), &page).await {
                tracing::warn!("Failed to cache {}: {}", url, e);
            }
        }

        result
    }
}
