use serde::Deserialize;

/// Main configuration structure for the documentation crawler
///
/// Every section is optional; missing sections take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub cache: CacheConfig,
    #[serde(rename = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    pub server: ServerConfig,
    pub ingest: IngestConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Page-count cap: the crawl stops once more than this many pages were visited
    pub max_depth: usize,

    /// Per-request timeout for page and robots.txt fetches (seconds)
    pub request_timeout_secs: u64,

    /// Whether a cache hit still contributes its outbound links to the frontier
    pub follow_links_on_cache_hit: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            request_timeout_secs: 30,
            follow_links_on_cache_hit: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler, also the product token matched against robots.txt
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// Optional URL with information about the crawler
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "DocumixScraper".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: None,
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Full User-Agent header value
    ///
    /// Format: `Name/Version (+ContactURL; ContactEmail)`, or
    /// `Name/Version (ContactEmail)` without a contact URL.
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact_url) => format!(
                "{}/{} (+{}; {})",
                self.crawler_name, self.crawler_version, contact_url, self.contact_email
            ),
            None => format!(
                "{}/{} ({})",
                self.crawler_name, self.crawler_version, self.contact_email
            ),
        }
    }
}

/// Which store backs the content cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    Memory,
    Sqlite,
}

/// Content cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    pub backend: CacheBackendKind,

    /// Path to the SQLite file, used when `backend = "sqlite"`
    pub database_path: String,

    /// Expiry applied to every cached content item (seconds)
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            database_path: "./documix-cache.db".to_string(),
            ttl_seconds: 86_400,
        }
    }
}

/// Sliding window rate limit for the crawl endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window_seconds: 600,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Chunking policy for handing content to the embedding pipeline
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IngestConfig {
    /// Maximum characters per chunk
    pub chunk_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { chunk_size: 2000 }
    }
}
