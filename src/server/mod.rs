//! HTTP boundary for on-demand crawls
//!
//! Exposes `GET /scrape?url=<absolute URL>` behind a per-client rate limit,
//! plus `GET /health` for deployment probes. The scraper and limiter are
//! built once at startup and shared by every request; each request runs its
//! own crawl with fresh traversal state.

mod handlers;

pub use handlers::{client_ip, health, scrape, ScrapeParams, DEFAULT_CLIENT_IP};

use crate::cache::{CacheBackend, ContentCache};
use crate::config::Config;
use crate::crawler::DocumentationScraper;
use crate::rate_limit::{RateLimiter, SlidingWindowLimiter};
use crate::CrawlError;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Time between sweeps of expired cache entries and robots policies
const PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Shared state handed to every request handler
pub struct AppState<C> {
    pub scraper: Arc<DocumentationScraper<C>>,
    pub limiter: Arc<dyn RateLimiter>,
}

impl<C> AppState<C> {
    pub fn new(scraper: DocumentationScraper<C>, limiter: impl RateLimiter + 'static) -> Self {
        Self {
            scraper: Arc::new(scraper),
            limiter: Arc::new(limiter),
        }
    }
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            scraper: Arc::clone(&self.scraper),
            limiter: Arc::clone(&self.limiter),
        }
    }
}

/// Builds the router for the crawl service
pub fn router<C: ContentCache + 'static>(state: AppState<C>) -> Router {
    Router::new()
        .route("/scrape", get(scrape::<C>))
        .route("/health", get(health))
        .with_state(state)
}

/// Runs the crawl service until interrupted
///
/// # Arguments
///
/// * `config` - Loaded configuration; `server.bind-address` is used unless `bind` is given
/// * `bind` - Optional address overriding the configured one
pub async fn serve(config: &Config, bind: Option<SocketAddr>) -> Result<(), CrawlError> {
    let addr = match bind {
        Some(addr) => addr,
        None => config
            .server
            .bind_address
            .parse::<SocketAddr>()
            .map_err(|e| CrawlError::Server(format!("Invalid bind address: {}", e)))?,
    };

    let cache = CacheBackend::from_config(&config.cache)?;
    let scraper = DocumentationScraper::new(config, cache)?;
    let limiter = SlidingWindowLimiter::from_config(&config.rate_limit);
    let state = AppState::new(scraper, limiter);
    let purger = tokio::spawn(purge_periodically(
        Arc::clone(&state.scraper),
        PURGE_INTERVAL,
    ));
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    purger.abort();
    result?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Sweeps expired cache entries and robots policies every `period`
pub async fn purge_periodically<C: ContentCache>(
    scraper: Arc<DocumentationScraper<C>>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let removed = scraper.purge_expired();
        if removed > 0 {
            tracing::info!("Purged {} expired entries", removed);
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
