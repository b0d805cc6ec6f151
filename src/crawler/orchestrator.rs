//! Crawl orchestration
//!
//! [`DocumentationScraper`] drives the fetch → robots-check → extract →
//! link-discover loop for one seed URL at a time. The HTTP client, robots
//! memo and content cache are shared between crawls; the visited set and
//! frontier live in a [`CrawlState`] owned by a single `crawl` call.

use crate::cache::{load_content, store_content, ContentCache};
use crate::config::{Config, CrawlerConfig};
use crate::crawler::extract::{extract_content, ContentItem};
use crate::crawler::fetcher::{build_http_client, fetch_page, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::crawler::links::extract_links;
use crate::robots::RobotsChecker;
use crate::CrawlError;
use reqwest::Client;
use scraper::Html;
use std::collections::{BTreeSet, HashSet};
use std::time::Instant;
use url::Url;

/// Traversal state for one crawl
#[derive(Debug)]
pub struct CrawlState {
    /// Seed scheme, host and path; root-relative links resolve against its origin
    pub base_url: Url,

    /// URLs fetched successfully during this crawl
    pub visited: HashSet<String>,

    /// URLs discovered but not yet fetched
    pub frontier: Frontier,
}

impl CrawlState {
    /// Starts a crawl at `seed`
    pub fn new(seed: &Url) -> Self {
        Self {
            base_url: base_url_for(seed),
            visited: HashSet::new(),
            frontier: Frontier::with_seed(seed.as_str()),
        }
    }

    /// Whether the page-count cap still allows another visit
    pub fn within_page_cap(&self, max_depth: usize) -> bool {
        self.visited.len() <= max_depth
    }

    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    /// Queues a discovered URL unless it was already visited
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) {
            return false;
        }
        self.frontier.push(url)
    }
}

/// The seed without query or fragment
pub fn base_url_for(seed: &Url) -> Url {
    let mut base = seed.clone();
    base.set_query(None);
    base.set_fragment(None);
    base
}

/// What one fetched page contributed to the crawl
#[derive(Debug, Default)]
struct PageOutcome {
    item: Option<ContentItem>,
    links: BTreeSet<String>,
}

/// Same-origin documentation crawler
pub struct DocumentationScraper<C> {
    client: Client,
    robots: RobotsChecker,
    cache: C,
    config: CrawlerConfig,
    cache_ttl: u64,
}

impl<C: ContentCache> DocumentationScraper<C> {
    /// Creates a scraper from configuration and an injected cache store
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentationScraper)` - Ready to crawl
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &Config, cache: C) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.user_agent, &config.crawler)?;
        let robots = RobotsChecker::new(client.clone(), config.user_agent.crawler_name.clone());

        Ok(Self {
            client,
            robots,
            cache,
            config: config.crawler.clone(),
            cache_ttl: config.cache.ttl_seconds,
        })
    }

    /// The shared content cache
    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Drops expired cache entries and stale robots policies
    ///
    /// Returns the number of entries removed across both stores.
    pub fn purge_expired(&self) -> usize {
        let policies = self.robots.purge_stale();
        let entries = match self.cache.purge_expired() {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!("Cache purge failed: {}", e);
                0
            }
        };

        tracing::debug!(
            "Purged {} cache entries and {} robots policies",
            entries,
            policies
        );
        entries + policies
    }

    /// Crawls same-host pages reachable from `seed_url`
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ContentItem>)` - Extracted items in visit order (possibly empty)
    /// * `Err(CrawlError::InvalidUrl)` - The seed is not an absolute URL; nothing was fetched
    ///
    /// # Example
    ///
    /// ```no_run
    /// use documix_crawler::{Config, DocumentationScraper, MemoryCache};
    ///
    /// # async fn example() -> Result<(), documix_crawler::CrawlError> {
    /// let scraper = DocumentationScraper::new(&Config::default(), MemoryCache::new())?;
    /// let items = scraper.crawl("https://docs.example.com/").await?;
    /// println!("Extracted {} pages", items.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn crawl(&self, seed_url: &str) -> Result<Vec<ContentItem>, CrawlError> {
        let seed = parse_seed(seed_url)?;
        let mut state = CrawlState::new(&seed);
        let mut results = Vec::new();
        let start_time = Instant::now();

        tracing::info!("Starting crawl at {}", state.base_url);

        while state.within_page_cap(self.config.max_depth) {
            let Some(current) = state.frontier.pop() else {
                tracing::debug!("Frontier is empty, crawl complete");
                break;
            };

            if state.visited.contains(&current) {
                continue;
            }

            self.scrape_url(&current, &mut state, &mut results).await;
        }

        tracing::info!(
            "Crawl completed: {} pages visited, {} items extracted in {:?}",
            state.visited.len(),
            results.len(),
            start_time.elapsed()
        );

        Ok(results)
    }

    /// Processes one frontier URL; every failure here only skips the page
    async fn scrape_url(
        &self,
        url_str: &str,
        state: &mut CrawlState,
        results: &mut Vec<ContentItem>,
    ) {
        let url = match Url::parse(url_str) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Skipping unparseable frontier URL {}: {}", url_str, e);
                return;
            }
        };

        if !self.robots.can_fetch(&url).await {
            tracing::info!("URL {} disallowed by robots.txt", url);
            return;
        }

        tracing::info!("Scraping: {}", url);

        let body = match fetch_page(&self.client, &url).await {
            FetchResult::Success {
                final_url,
                status_code,
                body,
            } => {
                tracing::debug!("Fetched {} ({}) from {}", url, status_code, final_url);
                body
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Failed to fetch {}: HTTP {}", url, status_code);
                return;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Error scraping {}: {}", url, error);
                return;
            }
        };

        state.mark_visited(url_str);

        let outcome = self.process_page(&url, &body, &state.base_url).await;

        if let Some(item) = outcome.item {
            results.push(item);
        }

        let mut queued = 0;
        for link in outcome.links {
            if state.enqueue(link) {
                queued += 1;
            }
        }
        tracing::debug!(
            "Queued {} new links from {} ({} in frontier)",
            queued,
            url,
            state.frontier.len()
        );
    }

    /// Extracts content and links, consulting the cache first
    ///
    /// A cache hit reuses the stored item as-is and, unless
    /// `follow-links-on-cache-hit` is set, contributes no links.
    async fn process_page(&self, url: &Url, body: &str, base_url: &Url) -> PageOutcome {
        let cached = match load_content(&self.cache, url.as_str()).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!("Cache read failed for {}, treating as miss: {}", url, e);
                None
            }
        };

        if let Some(item) = cached {
            tracing::debug!("Cache hit for {}", url);
            let links = if self.config.follow_links_on_cache_hit {
                let document = Html::parse_document(body);
                extract_links(&document, url, base_url)
            } else {
                BTreeSet::new()
            };
            return PageOutcome {
                item: Some(item),
                links,
            };
        }

        // The parsed document is not Send; keep it out of any await
        let (item, links) = {
            let document = Html::parse_document(body);
            (
                extract_content(&document, url.as_str()),
                extract_links(&document, url, base_url),
            )
        };

        match &item {
            Some(item) => {
                if let Err(e) = store_content(&self.cache, item, self.cache_ttl).await {
                    tracing::warn!("Cache write failed for {}: {}", url, e);
                }
            }
            None => tracing::debug!("No content extracted from {}", url),
        }

        PageOutcome { item, links }
    }
}

/// Validates the seed URL before any network activity
fn parse_seed(seed_url: &str) -> Result<Url, CrawlError> {
    let seed = Url::parse(seed_url).map_err(|source| CrawlError::InvalidUrl {
        url: seed_url.to_string(),
        source,
    })?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(CrawlError::UnsupportedScheme {
            url: seed_url.to_string(),
        });
    }

    Ok(seed)
}
