//! Crawler module for documentation fetching and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and error classification
//! - Content extraction and whitespace normalization
//! - Same-host link discovery
//! - Frontier management and crawl orchestration

mod extract;
mod fetcher;
mod frontier;
mod links;
mod orchestrator;

pub use extract::{clean_text, extract_content, extract_title, main_content_text, ContentItem};
pub use fetcher::{build_http_client, fetch_page, FetchResult};
pub use frontier::Frontier;
pub use links::{extract_links, resolve_href};
pub use orchestrator::{base_url_for, CrawlState, DocumentationScraper};

use crate::cache::CacheBackend;
use crate::config::Config;
use crate::CrawlError;

/// Runs a single crawl with the cache backend named in the configuration
///
/// This is the entry point for one-shot crawls. It will:
/// 1. Open the configured cache store
/// 2. Build the HTTP client and robots checker
/// 3. Crawl from `seed_url` until the frontier empties or the page cap is hit
///
/// # Example
///
/// ```no_run
/// use documix_crawler::config::Config;
/// use documix_crawler::crawler::crawl;
///
/// # async fn example() -> Result<(), documix_crawler::CrawlError> {
/// let items = crawl(&Config::default(), "https://docs.example.com/").await?;
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: &Config, seed_url: &str) -> Result<Vec<ContentItem>, CrawlError> {
    let cache = CacheBackend::from_config(&config.cache)?;
    let scraper = DocumentationScraper::new(config, cache)?;
    scraper.crawl(seed_url).await
}
