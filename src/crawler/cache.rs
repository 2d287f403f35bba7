//! On-disk response cache
//!
//! Successful page bodies are stored under the cache directory so repeated
//! runs do not hit the network again. Entries never expire; delete the
//! directory to refetch.
//!
//! An entry file holds the URL the body was finally served from on its first
//! line, followed by the body.

use sha2::{Digest, Sha256};
use std::io;
use std::path::{Path, PathBuf};

/// A cached response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedPage {
    /// URL the body was served from, after redirects
    pub final_url: String,
    /// Page body content
    pub body: String,
}

impl CachedPage {
    fn encode(&self) -> String {
        format!("{}\n{}", self.final_url, self.body)
    }

    fn decode(contents: &str) -> Option<Self> {
        let (final_url, body) = contents.split_once('\n')?;
        if final_url.is_empty() || final_url.contains('\r') {
            return None;
        }
        Some(Self {
            final_url: final_url.to_string(),
            body: body.to_string(),
        })
    }
}

/// Directory-backed cache of page bodies keyed by URL
#[derive(Debug, Clone)]
pub struct ResponseCache {
    dir: PathBuf,
}

impl ResponseCache {
    /// Creates a cache rooted at `dir`; the directory is created lazily
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the cache root
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file an entry for `url` lives in
    ///
    /// Layout: `<dir>/<first two hex chars>/<sha256 hex of url>`
    pub fn entry_path(&self, url: &str) -> PathBuf {
        let key = hex::encode(Sha256::digest(url.as_bytes()));
        self.dir.join(&key[..2]).join(key)
    }

    /// Reads a cached page
    ///
    /// A missing, unreadable or malformed entry is a miss.
    pub async fn get(&self, url: &str) -> Option<CachedPage> {
        let path = self.entry_path(url);
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match CachedPage::decode(&contents) {
                Some(page) => {
                    tracing::debug!("Cache hit for {} ({})", url, path.display());
                    Some(page)
                }
                None => {
                    tracing::warn!("Ignoring malformed cache entry {}", path.display());
                    None
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache entry {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Stores a page under the URL it was requested as
    ///
    /// The entry is written to a sibling temp file and renamed into place so a
    /// concurrent reader never sees a partial body.
    pub async fn put(&self, url: &str, page: &CachedPage) -> io::Result<()> {
        let path = self.entry_path(url);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push("~");
        tokio::fs::write(&tmp, page.encode()).await?;
        tokio::fs::rename(&tmp, &path).await?;

        tracing::trace!("Cached {} at {}", url, path.display());
        Ok(())
    }
}
