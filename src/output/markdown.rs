//! Markdown document generation
//!
//! Renders the pages of one crawl as a single markdown document, one section
//! per page in crawl order, for hand-off to tools that ingest plain text.

use crate::crawler::{base_url_for, ContentItem};
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

/// Writes the markdown rendering of a crawl to `output_path`
///
/// # Arguments
///
/// * `base_url` - The documentation root the crawl started from
/// * `items` - Pages in crawl order
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown(base_url: &str, items: &[ContentItem], output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown(base_url, items);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// The documentation root named in the document header
///
/// This is the seed without its query or fragment. Unparseable seeds are
/// returned unchanged.
pub fn document_base(seed_url: &str) -> String {
    match Url::parse(seed_url) {
        Ok(seed) => base_url_for(&seed).to_string(),
        Err(_) => seed_url.to_string(),
    }
}

/// Formats crawled pages as one markdown document
pub fn format_markdown(base_url: &str, items: &[ContentItem]) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Documentation for {}\n\n", base_url));

    for item in items {
        md.push_str(&format!("## {}\n\n", item.title));
        md.push_str(&format!("Source: {}\n\n", item.url));
        md.push_str(&item.content);
        md.push_str("\n\n---\n\n");
    }

    md
}
