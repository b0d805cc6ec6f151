//! Content extraction from fetched HTML
//!
//! Turns one parsed document into a [`ContentItem`]:
//! - text inside `script`, `style`, `nav`, `footer` and `header` is ignored
//! - the primary region is the first of `main`, `article`, `.content`, `body`
//!   that matches
//! - the region's text is normalized by [`clean_text`]

use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Elements whose text never counts as page content
const NOISE_ELEMENTS: [&str; 5] = ["script", "style", "nav", "footer", "header"];

/// Primary content containers, in priority order
const CONTENT_SELECTORS: [&str; 4] = ["main", "article", ".content", "body"];

static LONG_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("hardcoded regex pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("hardcoded regex pattern is valid"));

/// Normalized text extracted from one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Cleaned page text, never empty
    pub content: String,

    /// Absolute URL the content was extracted from
    pub url: String,

    /// Page `<title>`, or the URL when the page has none
    pub title: String,
}

/// Normalizes whitespace in extracted page text
///
/// Lines are trimmed and split into phrases on runs of two or more whitespace
/// characters; non-empty phrases are joined with single spaces, any remaining
/// whitespace run collapses to one space, and the result is trimmed.
///
/// # Example
///
/// ```
/// use documix_crawler::crawler::clean_text;
///
/// assert_eq!(clean_text("Hello   \n\n  World  \t foo"), "Hello World foo");
/// ```
pub fn clean_text(text: &str) -> String {
    let phrases: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .flat_map(|line| LONG_WHITESPACE.split(line))
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .collect();

    let joined = phrases.join(" ");
    WHITESPACE_RUN.replace_all(&joined, " ").trim().to_string()
}

/// Extracts a content item from a parsed document
///
/// Returns `None` when the page has no text left after normalization.
pub fn extract_content(document: &Html, url: &str) -> Option<ContentItem> {
    let content = clean_text(&main_content_text(document));
    if content.is_empty() {
        return None;
    }

    let title = extract_title(document).unwrap_or_else(|| url.to_string());

    Some(ContentItem {
        content,
        url: url.to_string(),
        title,
    })
}

/// Raw (unnormalized) text of the primary content region
pub fn main_content_text(document: &Html) -> String {
    let mut text = String::new();
    for region in content_regions(document) {
        collect_text(region, &mut text);
    }
    text
}

/// Extracts the page title from the HTML document
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    let title: String = document
        .select(&title_selector)
        .flat_map(|element| element.text())
        .collect();

    let title = title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// All elements matching the highest-priority content selector
fn content_regions(document: &Html) -> Vec<ElementRef<'_>> {
    for selector in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector) else {
            continue;
        };

        let matches: Vec<ElementRef<'_>> = document
            .select(&selector)
            .filter(|element| !is_noise(*element) && !inside_noise(*element))
            .collect();

        if !matches.is_empty() {
            return matches;
        }
    }

    Vec::new()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !is_noise(child_element) {
                collect_text(child_element, out);
            }
        } else if let Node::Text(text) = child.value() {
            out.push_str(text);
        }
    }
}

fn is_noise(element: ElementRef<'_>) -> bool {
    NOISE_ELEMENTS.contains(&element.value().name())
}

fn inside_noise(element: ElementRef<'_>) -> bool {
    element.ancestors().any(|ancestor| {
        ancestor
            .value()
            .as_element()
            .is_some_and(|el| NOISE_ELEMENTS.contains(&el.name()))
    })
}
