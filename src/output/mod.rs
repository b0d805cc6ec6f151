//! Output module for exporting crawl results
//!
//! This module handles:
//! - Rendering crawled pages as a single markdown document
//! - Writing JSON exports of the raw content items

mod markdown;

pub use markdown::{document_base, format_markdown, write_markdown};

use crate::crawler::ContentItem;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Output-specific errors
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Serializes items as a pretty-printed JSON array
pub fn format_json(items: &[ContentItem]) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

/// Writes items to `output_path` as a JSON array
pub fn write_json(items: &[ContentItem], output_path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(&mut writer, items)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
