//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use documix_crawler::cache::{scrape_key, CacheError, CacheResult, ContentCache};
use documix_crawler::config::{Config, CrawlerConfig};
use documix_crawler::crawler::crawl;
use documix_crawler::{ContentItem, CrawlError, DocumentationScraper, MemoryCache};
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with the given page cap
fn create_test_config(max_depth: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            request_timeout_secs: 5,
            follow_links_on_cache_hit: false,
        },
        ..Config::default()
    }
}

fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, page_path: &str, title: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_page(title, body))
        .mount(server)
        .await;
}

/// Cache store whose every operation fails
struct UnavailableCache;

impl ContentCache for UnavailableCache {
    async fn get(&self, _key: &str) -> CacheResult<Option<String>> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: &str, _expire_seconds: u64) -> CacheResult<()> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

async fn mount_missing_robots(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_missing_robots(&mock_server).await;

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<main>Welcome to the docs</main>
        <a href="/a">A</a>
        <a href="/b">B</a>
        <a href="https://other.example.org/x">Elsewhere</a>
        <a href="/manual.pdf">Manual</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        "Page A",
        &format!(r#"<main>Alpha</main><a href="{}/">Home</a><a href="/b">B</a>"#, base_url),
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        "Page B",
        r#"<main>Beta</main><a href="/">Home</a><a href="a">A</a>"#,
    )
    .await;

    // Filtered links are never fetched
    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let items = crawl(&create_test_config(5), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    let urls: Vec<&str> = items.iter().map(|item| item.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base_url),
            format!("{}/a", base_url),
            format!("{}/b", base_url),
        ]
    );

    assert_eq!(items[0].title, "Home");
    assert_eq!(items[0].content, "Welcome to the docs");
    assert_eq!(items[1].content, "Alpha");
    assert_eq!(items[2].title, "Page B");
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<p>Start</p><a href="/private/secret">Secret</a><a href="/public">Public</a>"#,
    )
    .await;
    mount_page(&mock_server, "/public", "Public", "<p>Open page</p>").await;

    Mock::given(method("GET"))
        .and(path("/private/secret"))
        .respond_with(html_page("Secret", "<a href=\"/leak\">leak</a>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let items = crawl(&create_test_config(5), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Public"]);
}

#[tokio::test]
async fn test_robots_rules_match_crawler_name() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: DocumixScraper\nDisallow: /\n\nUser-agent: *\nAllow: /\n"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("Home", "<p>Hidden from us</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let items = crawl(&create_test_config(5), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_invalid_seed_makes_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let address = mock_server.address();
    let result = crawl(
        &create_test_config(5),
        &format!("ftp://{}/", address),
    )
    .await;
    assert!(matches!(result, Err(CrawlError::UnsupportedScheme { .. })));

    let result = crawl(&create_test_config(5), "docs/getting-started").await;
    assert!(matches!(result, Err(CrawlError::InvalidUrl { .. })));
}

#[tokio::test]
async fn test_cache_hit_reuses_item_without_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_missing_robots(&mock_server).await;

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<article>Cached   landing page</article><a href="/next">Next</a>"#,
    )
    .await;

    // Only the first crawl discovers /next
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("Next", "<p>Second page</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = DocumentationScraper::new(&create_test_config(5), MemoryCache::new())
        .expect("Failed to build scraper");
    let seed = format!("{}/", base_url);

    let first = scraper.crawl(&seed).await.expect("First crawl failed");
    assert_eq!(first.len(), 2);
    assert_eq!(scraper.cache().len(), 2);

    let second = scraper.crawl(&seed).await.expect("Second crawl failed");
    assert_eq!(second, vec![first[0].clone()]);
    assert_eq!(second[0].content, "Cached landing page");
}

#[tokio::test]
async fn test_failed_fetch_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_missing_robots(&mock_server).await;

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<p>Index</p><a href="/broken">Broken</a><a href="/ok">Ok</a>"#,
    )
    .await;
    mount_page(&mock_server, "/ok", "Ok", "<p>Fine</p>").await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let items = crawl(&create_test_config(5), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    let urls: Vec<String> = items.into_iter().map(|item| item.url).collect();
    assert_eq!(urls, vec![format!("{}/", base_url), format!("{}/ok", base_url)]);
}

#[tokio::test]
async fn test_crawl_with_page_cap() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_missing_robots(&mock_server).await;

    mount_page(&mock_server, "/", "Home", r#"<p>Zero</p><a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/a", "A", r#"<p>One</p><a href="/b">B</a>"#).await;

    // The loop stops once more than max_depth pages were visited
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("B", "<p>Two</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let items = crawl(&create_test_config(1), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_empty_page_still_discovers_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_missing_robots(&mock_server).await;

    mount_page(
        &mock_server,
        "/",
        "Empty",
        r#"<script>var docs = 1;</script><a href="/guide"></a>"#,
    )
    .await;
    mount_page(&mock_server, "/guide", "Guide", "<main>Real content</main>").await;

    let items = crawl(&create_test_config(5), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].url, format!("{}/guide", base_url));
    assert_eq!(items[0].content, "Real content");
}

#[tokio::test]
async fn test_page_without_title_uses_url() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_missing_robots(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>Untitled</p></body></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let items = crawl(&create_test_config(5), &seed)
        .await
        .expect("Crawl failed");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, seed);
}

#[tokio::test]
async fn test_unavailable_cache_degrades_to_fresh_extraction() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_missing_robots(&mock_server).await;

    mount_page(
        &mock_server,
        "/",
        "Home",
        r#"<main>Still served</main><a href="/next">Next</a>"#,
    )
    .await;
    mount_page(&mock_server, "/next", "Next", "<main>Second page</main>").await;

    let scraper = DocumentationScraper::new(&create_test_config(5), UnavailableCache)
        .expect("Failed to build scraper");
    let items = scraper
        .crawl(&format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    let contents: Vec<&str> = items.iter().map(|item| item.content.as_str()).collect();
    assert_eq!(contents, vec!["Still served", "Second page"]);
}

#[tokio::test]
async fn test_corrupt_cache_entry_is_replaced() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_missing_robots(&mock_server).await;

    mount_page(&mock_server, "/", "Home", "<main>Fresh text</main>").await;

    let seed = format!("{}/", base_url);
    let cache = MemoryCache::new();
    cache
        .set(&scrape_key(&seed), "{not json", 3600)
        .await
        .expect("Failed to seed cache");

    let scraper = DocumentationScraper::new(&create_test_config(5), cache)
        .expect("Failed to build scraper");
    let items = scraper.crawl(&seed).await.expect("Crawl failed");

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].content, "Fresh text");

    let stored = scraper
        .cache()
        .get(&scrape_key(&seed))
        .await
        .expect("Cache read failed")
        .expect("Entry missing");
    let stored: ContentItem = serde_json::from_str(&stored).expect("Entry is not valid JSON");
    assert_eq!(stored, items[0]);
}
