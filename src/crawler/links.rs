//! Link discovery for continuing a crawl
//!
//! # Link Extraction Rules
//!
//! **Resolution:**
//! - `href` starting with `/` resolves against the crawl's base origin; a
//!   protocol-relative `//host/path` takes its own host
//! - `href` without a scheme resolves against the current page
//! - anything else is taken as absolute
//!
//! **Exclude:**
//! - links whose host differs from the current page's host (ports are not compared)
//! - raw `href`s containing a fragment marker (`#`)
//! - raw `href`s ending in `.pdf` or `.zip`
//! - non-HTTP(S) targets (`mailto:`, `javascript:`, ...)
//! - hrefs that fail to resolve (logged, never fatal)

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// File extensions that never lead to documentation pages
const SKIPPED_EXTENSIONS: [&str; 2] = [".pdf", ".zip"];

/// Extracts the same-host links worth crawling from a page
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `current_url` - The URL the page was fetched from
/// * `base_url` - The crawl's base URL (seed scheme, host and path)
///
/// # Returns
///
/// The set of absolute URLs to add to the frontier
///
/// # Example
///
/// ```
/// use documix_crawler::crawler::extract_links;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<a href="/intro">Intro</a><a href="https://other.com/">x</a>"#);
/// let page = Url::parse("https://docs.example.com/").unwrap();
/// let links = extract_links(&html, &page, &page);
/// assert_eq!(links.into_iter().collect::<Vec<_>>(), vec!["https://docs.example.com/intro"]);
/// ```
pub fn extract_links(document: &Html, current_url: &Url, base_url: &Url) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if href.trim().is_empty() {
            continue;
        }

        let resolved = match resolve_href(href, current_url, base_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Invalid URL: {} ({})", href, e);
                continue;
            }
        };

        if is_followable(href, &resolved, current_url) {
            links.insert(resolved.to_string());
        }
    }

    links
}

/// Resolves an `href` to an absolute URL
pub fn resolve_href(href: &str, current_url: &Url, base_url: &Url) -> Result<Url, url::ParseError> {
    if href.starts_with('/') {
        return base_url.join(href);
    }

    match Url::parse(href) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => current_url.join(href),
        Err(e) => Err(e),
    }
}

fn is_followable(href: &str, resolved: &Url, current_url: &Url) -> bool {
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return false;
    }

    if resolved.host_str() != current_url.host_str() {
        return false;
    }

    if href.contains('#') {
        return false;
    }

    let lowered = href.to_ascii_lowercase();
    !SKIPPED_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}
