//! Configuration module for the documentation crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional and falls back to the defaults the crawl endpoint
//! has always used (page cap 5, 24h cache, 5 requests per 10 minutes).
//!
//! # Example
//!
//! ```no_run
//! use documix_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("documix.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_depth + 1);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CacheBackendKind, CacheConfig, Config, CrawlerConfig, IngestConfig, RateLimitConfig,
    ServerConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
