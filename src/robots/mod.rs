//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//!
//! Policy asymmetry: a robots.txt that answers with a non-2xx status allows
//! everything, while a transport or body error denies the URL.

mod cache;
mod parser;

pub use cache::CachedRobots;
pub use parser::ParsedRobots;

use crate::CrawlError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Memoized origin count at which stale policies are swept before inserting
const SWEEP_THRESHOLD: usize = 256;

/// Derives the robots.txt location for a URL (`scheme://host[:port]/robots.txt`)
pub fn robots_url(url: &Url) -> Result<Url, CrawlError> {
    if url.host_str().is_none() {
        return Err(CrawlError::Robots {
            url: url.to_string(),
            message: "URL has no host".to_string(),
        });
    }

    url.join("/robots.txt").map_err(|e| CrawlError::Robots {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Fetches and parses robots.txt for the origin of `url`
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - Parsed rules, or allow-all for a non-2xx response
/// * `Err(CrawlError)` - The request or body read failed
pub async fn fetch_robots(client: &Client, url: &Url) -> Result<ParsedRobots, CrawlError> {
    let robots_url = robots_url(url)?;

    let response = client
        .get(robots_url.clone())
        .send()
        .await
        .map_err(|source| CrawlError::Http {
            url: robots_url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        tracing::debug!(
            "robots.txt at {} returned {}, allowing all",
            robots_url,
            response.status()
        );
        return Ok(ParsedRobots::allow_all());
    }

    let body = response.text().await.map_err(|source| CrawlError::Http {
        url: robots_url.to_string(),
        source,
    })?;

    Ok(ParsedRobots::from_content(&body))
}

/// Robots policy checker for a fixed product token
///
/// Policies are memoized per origin for 24 hours. Failed lookups are never
/// memoized, so they are retried for the next URL on that origin.
pub struct RobotsChecker {
    client: Client,
    product_token: String,
    policies: Mutex<HashMap<String, CachedRobots>>,
}

impl RobotsChecker {
    /// Creates a checker that evaluates rules for `product_token`
    pub fn new(client: Client, product_token: impl Into<String>) -> Self {
        Self {
            client,
            product_token: product_token.into(),
            policies: Mutex::new(HashMap::new()),
        }
    }

    /// Returns whether `url` may be fetched; any lookup error denies
    pub async fn can_fetch(&self, url: &Url) -> bool {
        match self.check(url).await {
            Ok(allowed) => allowed,
            Err(e) => {
                tracing::warn!("robots.txt check failed for {}: {}", url, e);
                false
            }
        }
    }

    /// Evaluates robots.txt for `url`, surfacing lookup errors
    pub async fn check(&self, url: &Url) -> Result<bool, CrawlError> {
        let robots = self.policy_for(url).await?;
        Ok(robots.is_allowed(url.as_str(), &self.product_token))
    }

    async fn policy_for(&self, url: &Url) -> Result<ParsedRobots, CrawlError> {
        let origin = url.origin().ascii_serialization();

        if let Some(cached) = self.cached_policy(&origin) {
            tracing::trace!("Using cached robots.txt for {}", origin);
            return Ok(cached);
        }

        tracing::debug!("Fetching robots.txt for {}", origin);
        let robots = fetch_robots(&self.client, url).await?;

        self.remember(origin, CachedRobots::new(robots.clone()), Utc::now());

        Ok(robots)
    }

    /// Drops policies that went stale as of `now`, returning how many were removed
    pub fn purge_stale_at(&self, now: DateTime<Utc>) -> usize {
        let mut policies = self.policies.lock().unwrap_or_else(PoisonError::into_inner);
        let before = policies.len();
        policies.retain(|_, cached| !cached.is_stale_at(now));
        before - policies.len()
    }

    pub fn purge_stale(&self) -> usize {
        self.purge_stale_at(Utc::now())
    }

    fn remember(&self, origin: String, cached: CachedRobots, now: DateTime<Utc>) {
        let mut policies = self.policies.lock().unwrap_or_else(PoisonError::into_inner);
        if policies.len() >= SWEEP_THRESHOLD {
            policies.retain(|_, entry| !entry.is_stale_at(now));
        }
        policies.insert(origin, cached);
    }

    fn cached_policy(&self, origin: &str) -> Option<ParsedRobots> {
        let mut policies = self.policies.lock().unwrap_or_else(PoisonError::into_inner);
        match policies.get(origin) {
            Some(cached) if !cached.is_stale() => Some(cached.content.clone()),
            Some(_) => {
                policies.remove(origin);
                None
            }
            None => None,
        }
    }
}
