//! Content cache for extracted pages
//!
//! Extracted content items are memoized under `scrape:<url>` with a fixed
//! expiry so repeated crawls of the same documentation skip the network and
//! re-extraction. The cache is an optimization: the crawler treats read
//! failures as misses and skips failed writes.
//!
//! Backends:
//! - [`MemoryCache`]: process-local map, lost on restart
//! - [`SqliteCache`]: SQLite file shared across restarts
//! - [`CacheBackend`]: whichever of the two the configuration selects

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use crate::config::{CacheBackendKind, CacheConfig};
use crate::crawler::ContentItem;
use std::future::Future;
use std::path::Path;
use thiserror::Error;

/// Key prefix for cached content items
pub const SCRAPE_KEY_PREFIX: &str = "scrape:";

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Key-value store with per-key expiry
///
/// Implementations must make each `get` and `set` atomic per key; no
/// cross-key guarantees are needed.
pub trait ContentCache: Send + Sync {
    /// Returns the stored value, or `None` when absent or expired
    fn get(&self, key: &str) -> impl Future<Output = CacheResult<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value
    fn set(
        &self,
        key: &str,
        value: &str,
        expire_seconds: u64,
    ) -> impl Future<Output = CacheResult<()>> + Send;

    /// Removes expired entries, returning how many were dropped
    ///
    /// Stores that expire entries on their own keep the default.
    fn purge_expired(&self) -> CacheResult<usize> {
        Ok(0)
    }
}

/// Cache key for the content extracted from `url`
pub fn scrape_key(url: &str) -> String {
    format!("{}{}", SCRAPE_KEY_PREFIX, url)
}

/// Loads the cached content item for `url`
pub async fn load_content<C: ContentCache>(
    cache: &C,
    url: &str,
) -> CacheResult<Option<ContentItem>> {
    match cache.get(&scrape_key(url)).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Stores a content item under its URL's cache key
pub async fn store_content<C: ContentCache>(
    cache: &C,
    item: &ContentItem,
    expire_seconds: u64,
) -> CacheResult<()> {
    let raw = serde_json::to_string(item)?;
    cache.set(&scrape_key(&item.url), &raw, expire_seconds).await
}

/// Cache store selected by configuration
pub enum CacheBackend {
    Memory(MemoryCache),
    Sqlite(SqliteCache),
}

impl CacheBackend {
    /// Opens the backend named in the cache configuration
    pub fn from_config(config: &CacheConfig) -> CacheResult<Self> {
        match config.backend {
            CacheBackendKind::Memory => Ok(Self::Memory(MemoryCache::new())),
            CacheBackendKind::Sqlite => {
                let cache = SqliteCache::new(Path::new(&config.database_path))?;
                Ok(Self::Sqlite(cache))
            }
        }
    }
}

impl ContentCache for CacheBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            Self::Memory(cache) => cache.get(key).await,
            Self::Sqlite(cache) => cache.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &str, expire_seconds: u64) -> CacheResult<()> {
        match self {
            Self::Memory(cache) => cache.set(key, value, expire_seconds).await,
            Self::Sqlite(cache) => cache.set(key, value, expire_seconds).await,
        }
    }

    fn purge_expired(&self) -> CacheResult<usize> {
        match self {
            Self::Memory(cache) => cache.purge_expired(),
            Self::Sqlite(cache) => cache.purge_expired(),
        }
    }
}
