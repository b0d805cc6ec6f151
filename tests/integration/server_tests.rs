//! Integration tests for the HTTP boundary
//!
//! A wiremock server stands in for the documentation site while requests
//! are driven through the router in-process.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use documix_crawler::server::{router, AppState};
use documix_crawler::{Config, DocumentationScraper, MemoryCache, SlidingWindowLimiter};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app(max_requests: usize) -> axum::Router {
    let scraper = DocumentationScraper::new(&Config::default(), MemoryCache::new())
        .expect("Failed to build scraper");
    let limiter = SlidingWindowLimiter::new(max_requests, Duration::from_secs(600));
    router(AppState::new(scraper, limiter))
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header("x-real-ip", "192.0.2.50")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn encode(url: &str) -> String {
    url::form_urlencoded::byte_serialize(url.as_bytes()).collect()
}

#[tokio::test]
async fn test_scrape_returns_all_text_content() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<html><head><title>Docs</title></head>
                    <body><nav>Menu</nav><main>Getting started</main></body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let (status, body) = get_json(app(5), &format!("/scrape?url={}", encode(&seed))).await;

    assert_eq!(status, StatusCode::OK);
    let items = body["allTextContent"].as_array().expect("array of items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["url"], seed.as_str());
    assert_eq!(items[0]["title"], "Docs");
    assert_eq!(items[0]["content"], "Getting started");
}

#[tokio::test]
async fn test_unreachable_site_yields_empty_result() {
    // Robots lookup fails, so the seed is denied and nothing is extracted
    let (status, body) = get_json(
        app(5),
        &format!("/scrape?url={}", encode("http://127.0.0.1:1/")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allTextContent"], Value::Array(vec![]));
}

#[tokio::test]
async fn test_sixth_request_is_rate_limited() {
    let app = app(5);

    for _ in 0..5 {
        let (status, _) = get_json(app.clone(), "/scrape").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, body) = get_json(app, "/scrape").await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "Rate limit exceeded");
    assert_eq!(body["limit"], 5);
    assert_eq!(body["remaining"], 0);

    let reset = body["reset"].as_str().expect("reset timestamp");
    assert!(chrono::DateTime::parse_from_rfc3339(reset).is_ok());
}
