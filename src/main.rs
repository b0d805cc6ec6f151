//! Documix crawler main entry point
//!
//! This is the command-line interface for the documentation crawler: one-shot
//! crawls written to stdout or a file, or the rate-limited HTTP service.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use documix_crawler::config::{load_config_or_default, Config};
use documix_crawler::crawler::crawl;
use documix_crawler::ingest::chunk_content;
use documix_crawler::output::{
    document_base, format_json, format_markdown, write_json, write_markdown,
};
use documix_crawler::server::serve;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Documix crawler: documentation ingestion for retrieval-augmented chat
///
/// Crawls a documentation site from a seed URL, staying on the seed's host,
/// respecting robots.txt and caching extracted page text.
#[derive(Parser, Debug)]
#[command(name = "documix-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A polite documentation crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a documentation site once and print or save the result
    Crawl {
        /// Seed URL; only pages on its host are followed
        #[arg(value_name = "URL")]
        url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Serve `GET /scrape?url=` over HTTP
    Serve {
        /// Address to bind, overriding `server.bind-address`
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// JSON array of extracted pages
    Json,
    /// One markdown document with a section per page
    Markdown,
    /// JSON array of embedding-sized chunks
    Chunks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Command::Crawl {
            url,
            format,
            output,
        } => handle_crawl(&config, &url, format, output).await,
        Command::Serve { bind } => {
            serve(&config, bind).await.context("Server failed")?;
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("documix_crawler=info,warn"),
            1 => EnvFilter::new("documix_crawler=debug,info"),
            2 => EnvFilter::new("documix_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so crawl output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the one-shot crawl
async fn handle_crawl(
    config: &Config,
    url: &str,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let items = crawl(config, url)
        .await
        .with_context(|| format!("Crawl of {} failed", url))?;

    tracing::info!("Extracted {} pages", items.len());
    let base_url = document_base(url);

    match (format, output) {
        (OutputFormat::Json, Some(path)) => write_json(&items, &path)?,
        (OutputFormat::Json, None) => println!("{}", format_json(&items)?),
        (OutputFormat::Markdown, Some(path)) => write_markdown(&base_url, &items, &path)?,
        (OutputFormat::Markdown, None) => print!("{}", format_markdown(&base_url, &items)),
        (OutputFormat::Chunks, output) => {
            let chunks = chunk_content(&items, config.ingest.chunk_size);
            tracing::info!("Split into {} chunks", chunks.len());
            let json = serde_json::to_string_pretty(&chunks)?;
            match output {
                Some(path) => std::fs::write(&path, json + "\n")
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => println!("{}", json),
            }
        }
    }

    Ok(())
}
