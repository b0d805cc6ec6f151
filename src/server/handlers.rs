//! Request handlers for the crawl service

use crate::cache::ContentCache;
use crate::server::AppState;
use crate::CrawlError;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

/// Client key used when no forwarding header identifies the caller
pub const DEFAULT_CLIENT_IP: &str = "127.0.0.1";

/// Query parameters of `GET /scrape`
#[derive(Debug, Default, Deserialize)]
pub struct ScrapeParams {
    pub url: Option<String>,
}

/// Derives the rate-limit key for a request
///
/// Precedence: first `X-Forwarded-For` entry, then `X-Real-IP`, then
/// [`DEFAULT_CLIENT_IP`].
pub fn client_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(DEFAULT_CLIENT_IP)
        .to_string()
}

/// `GET /scrape?url=`
pub async fn scrape<C: ContentCache + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    Query(params): Query<ScrapeParams>,
) -> Response {
    let ip = client_ip(&headers);
    let decision = state.limiter.limit(&ip);

    if !decision.success {
        tracing::info!("Rate limit exceeded for {}", ip);
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded",
                "limit": decision.limit,
                "remaining": decision.remaining,
                "reset": decision.reset.to_rfc3339(),
            })),
        )
            .into_response();
    }

    let Some(url) = params.url.filter(|url| !url.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "No URL provided".to_string());
    };

    tracing::info!("Crawl requested by {} for {}", ip, url);

    match state.scraper.crawl(&url).await {
        Ok(items) => (StatusCode::OK, Json(json!({ "allTextContent": items }))).into_response(),
        Err(CrawlError::InvalidUrl { url, source }) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid URL: {} ({})", url, source),
        ),
        Err(CrawlError::UnsupportedScheme { url }) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid URL: {} (only http and https are supported)", url),
        ),
        Err(e) => {
            tracing::error!("Crawl of {} failed: {}", url, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
