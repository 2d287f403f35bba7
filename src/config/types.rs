use serde::{Deserialize, Deserializer};

/// Search listing the crawl starts from
pub const DEFAULT_SEED_URL: &str =
    "https://www.goodreads.com/search?utf8=%E2%9C%93&q=baby+sign+language&search_type=books";

/// The only host the crawl may visit by default
pub const DEFAULT_ALLOWED_DOMAIN: &str = "www.goodreads.com";

/// Default depth bound; the seed page is depth 1
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Default on-disk response cache location
pub const DEFAULT_CACHE_DIR: &str = "./cache";

/// Main configuration structure for Shelf-Ripple
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// What to do with a book row whose ratings cannot be parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Log the row, count it and keep crawling
    #[default]
    Skip,
    /// Stop the crawl with an error
    Halt,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// The single URL the crawl starts from
    #[serde(rename = "seed-url", default = "default_seed_url")]
    pub seed_url: String,

    /// Host patterns the crawl may visit (`host` or `*.domain`)
    #[serde(rename = "allowed-domains", default = "default_allowed_domains")]
    pub allowed_domains: Vec<String>,

    /// Maximum page depth (seed = 1); 0 disables the bound
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Directory for cached responses; `None` disables the cache
    ///
    /// In TOML, `cache-dir = false` or `cache-dir = ""` disables it and
    /// `cache-dir = true` keeps the default location.
    #[serde(
        rename = "cache-dir",
        default = "default_cache_dir",
        deserialize_with = "deserialize_cache_dir"
    )]
    pub cache_dir: Option<String>,

    /// Handling of rows with malformed ratings
    #[serde(rename = "on-record-error", default)]
    pub on_record_error: ErrorPolicy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: default_seed_url(),
            allowed_domains: default_allowed_domains(),
            max_depth: default_max_depth(),
            cache_dir: default_cache_dir(),
            on_record_error: ErrorPolicy::default(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

fn default_seed_url() -> String {
    DEFAULT_SEED_URL.to_string()
}

fn default_allowed_domains() -> Vec<String> {
    vec![DEFAULT_ALLOWED_DOMAIN.to_string()]
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_cache_dir() -> Option<String> {
    Some(DEFAULT_CACHE_DIR.to_string())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CacheDirSetting {
    Enabled(bool),
    Path(String),
}

fn deserialize_cache_dir<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CacheDirSetting::deserialize(deserializer)? {
        CacheDirSetting::Enabled(true) => default_cache_dir(),
        CacheDirSetting::Enabled(false) => None,
        CacheDirSetting::Path(path) if path.trim().is_empty() => None,
        CacheDirSetting::Path(path) => Some(path),
    })
}

fn default_crawler_name() -> String {
    "ShelfRipple".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
