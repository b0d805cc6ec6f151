//! Hand-off of crawl results to the embedding pipeline
//!
//! Long page content is split into fixed-size character chunks before it is
//! embedded and indexed. Each chunk keeps its page's URL and title so search
//! results can cite their source.

use crate::crawler::ContentItem;
use serde::Serialize;

/// One embeddable piece of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentChunk {
    pub content: String,
    pub url: String,
    pub title: String,

    /// Position of this chunk within its page, starting at 0
    pub chunk_index: usize,
}

/// Splits every item into chunks of at most `chunk_size` characters
///
/// Splits fall on character (not byte) boundaries. Items with empty content
/// produce no chunks. A `chunk_size` of 0 is treated as 1.
pub fn chunk_content(items: &[ContentItem], chunk_size: usize) -> Vec<ContentChunk> {
    items
        .iter()
        .flat_map(|item| chunk_item(item, chunk_size))
        .collect()
}

/// Splits one item into chunks of at most `chunk_size` characters
pub fn chunk_item(item: &ContentItem, chunk_size: usize) -> Vec<ContentChunk> {
    split_chars(&item.content, chunk_size.max(1))
        .into_iter()
        .enumerate()
        .map(|(chunk_index, content)| ContentChunk {
            content: content.to_string(),
            url: item.url.clone(),
            title: item.title.clone(),
            chunk_index,
        })
        .collect()
}

fn split_chars(text: &str, chunk_size: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == chunk_size {
            pieces.push(&text[start..offset]);
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}
