//! Documix crawler: documentation ingestion for retrieval-augmented chat
//!
//! This crate implements a same-origin documentation crawler that respects
//! robots.txt, extracts normalized page text, memoizes extraction results in a
//! content cache, and serves crawls over a rate-limited HTTP endpoint.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod ingest;
pub mod output;
pub mod rate_limit;
pub mod robots;
pub mod server;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Unsupported URL scheme in '{url}': only http and https can be crawled")]
    UnsupportedScheme { url: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Robots.txt error for {url}: {message}")]
    Robots { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{CacheBackend, ContentCache, MemoryCache, SqliteCache};
pub use config::Config;
pub use crawler::{ContentItem, DocumentationScraper};
pub use rate_limit::{RateLimitDecision, SlidingWindowLimiter};
