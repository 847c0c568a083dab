//! Crawler module for fetching and pipeline orchestration
//!
//! This module contains the network-facing side of the census, including:
//! - HTTP fetching with rate-limit handling
//! - Link harvesting from HTML pages
//! - Windowed batch scheduling
//! - End-to-end pipeline coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;

pub use coordinator::{Pipeline, UrlLimit};
pub use fetcher::{build_http_client, parse_retry_after, FetchOptions, Fetcher};
pub use parser::{harvest_links, harvest_same_host_links, resolve_link};
pub use scheduler::{BatchOutcome, BatchScheduler, ItemFailure};

use crate::config::Config;
use crate::record::PipelineResult;
use crate::CensusError;

/// Runs a complete census of one site
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client and pipeline stages
/// 2. Discover page URLs from the site's sitemaps
/// 3. Classify, supplement and extract every page
/// 4. Inject synthetic coverage and compute statistics
///
/// # Arguments
///
/// * `config` - The pipeline configuration
/// * `entry` - Site or sitemap URL
/// * `limit` - Cap on discovered URLs
pub async fn census(
    config: Config,
    entry: &str,
    limit: UrlLimit,
) -> Result<PipelineResult, CensusError> {
    let pipeline = Pipeline::new(config)?;
    Ok(pipeline.run_site(entry, limit).await)
}
