//! Sitemap discovery
//!
//! Resolves a site or sitemap URL into a flat list of page URLs:
//! - probes robots.txt and well-known locations when given a bare site URL
//! - recurses through sitemap indexes with bounded depth and concurrency
//! - drops entries that are not absolute http(s) URLs
//!
//! Failures never propagate: a node that cannot be fetched or parsed
//! contributes an empty list, and sibling subtrees still count.

mod robots;
mod xml;

pub use robots::declared_sitemaps;
pub use xml::{parse_sitemap, SitemapDocument};

use crate::crawler::{BatchScheduler, FetchOptions, Fetcher};
use crate::output::PipelineObserver;
use crate::CensusError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use url::Url;

/// Well-known sitemap paths, probed in order after robots.txt declarations
pub const WELL_KNOWN_LOCATIONS: &[&str] = &[
    "/sitemap.xml",
    "/sitemap_index.xml",
    "/sitemap/sitemap.xml",
    "/wp-sitemap.xml",
    "/page-sitemap.xml",
];

/// Returns true if the URL names a sitemap location
pub fn looks_like_sitemap(url: &str) -> bool {
    url.to_lowercase().contains("sitemap")
}

/// Returns true for absolute http(s) URLs with a host
pub fn is_page_url(candidate: &str) -> bool {
    Url::parse(candidate)
        .map(|u| (u.scheme() == "http" || u.scheme() == "https") && u.host_str().is_some())
        .unwrap_or(false)
}

/// Builds the ordered probe list for a site URL
///
/// Robots.txt declarations come first, then the entry URL itself when it
/// names a specific document, then the well-known locations.
pub fn candidate_locations(entry: &Url, declared: &[String]) -> Vec<String> {
    let mut candidates: Vec<String> = declared.to_vec();

    let path = entry.path();
    if !path.is_empty() && path != "/" {
        candidates.push(entry.to_string());
    }

    for location in WELL_KNOWN_LOCATIONS {
        if let Ok(candidate) = entry.join(location) {
            candidates.push(candidate.to_string());
        }
    }

    let mut unique = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if !unique.contains(&candidate) {
            unique.push(candidate);
        }
    }
    unique
}

/// Sitemap tree walker
#[derive(Clone)]
pub struct SitemapDiscovery {
    fetcher: Fetcher,
    scheduler: BatchScheduler,
    max_depth: u32,
    observer: Arc<dyn PipelineObserver>,
}

impl SitemapDiscovery {
    pub fn new(
        fetcher: Fetcher,
        scheduler: BatchScheduler,
        max_depth: u32,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            fetcher,
            scheduler,
            max_depth,
            observer,
        }
    }

    /// Discovers page URLs starting from a site or sitemap URL
    ///
    /// Nodes deeper than the configured maximum depth yield an empty list
    /// without being fetched, which bounds recursion on cyclic indexes.
    pub async fn discover(&self, entry_url: &str, depth: u32) -> Vec<String> {
        let location = if looks_like_sitemap(entry_url) {
            entry_url.to_string()
        } else {
            match self.resolve_location(entry_url).await {
                Some(location) => location,
                None => return Vec::new(),
            }
        };

        self.walk(location, depth).await
    }

    /// Picks the sitemap location for a site URL by probing candidates with HEAD
    pub async fn resolve_location(&self, site_url: &str) -> Option<String> {
        let entry = match Url::parse(site_url) {
            Ok(entry) => entry,
            Err(e) => {
                self.observer.sitemap_failed(site_url, 0, &e.to_string());
                return None;
            }
        };

        let declared = match entry.join("/robots.txt") {
            Ok(robots_url) => match self
                .fetcher
                .get(robots_url.as_str(), FetchOptions::default())
                .await
            {
                Ok(body) => declared_sitemaps(&body),
                Err(e) => {
                    tracing::debug!("No robots.txt at {}: {}", robots_url, e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        for candidate in candidate_locations(&entry, &declared) {
            match self.fetcher.head(&candidate).await {
                Ok(_) => {
                    tracing::info!("Using sitemap at {}", candidate);
                    return Some(candidate);
                }
                Err(e) => tracing::debug!("Sitemap probe {} failed: {}", candidate, e),
            }
        }

        let fallback = entry.join("/sitemap.xml").ok()?.to_string();
        tracing::info!("No sitemap probe succeeded, falling back to {}", fallback);
        Some(fallback)
    }

    fn walk(&self, location: String, depth: u32) -> BoxFuture<'_, Vec<String>> {
        async move {
            if depth > self.max_depth {
                tracing::debug!("Depth {} exceeded, skipping {}", depth, location);
                return Vec::new();
            }

            let document = match self.fetch_document(&location).await {
                Ok(document) => document,
                Err(e) => {
                    self.observer
                        .sitemap_failed(&location, depth, &e.to_string());
                    return Vec::new();
                }
            };

            let urls = match document {
                SitemapDocument::Index(children) => {
                    self.observer
                        .sitemap_parsed(&location, depth, children.len());
                    let children: Vec<String> =
                        children.into_iter().filter(|c| is_page_url(c)).collect();

                    self.scheduler
                        .run(children, move |child| async move {
                            Ok::<_, CensusError>(self.walk(child, depth + 1).await)
                        })
                        .await
                        .into_iter()
                        .filter_map(Result::ok)
                        .flatten()
                        .collect::<Vec<_>>()
                }
                SitemapDocument::UrlSet(pages) => {
                    self.observer.sitemap_parsed(&location, depth, pages.len());
                    pages
                }
            };

            urls.into_iter().filter(|u| is_page_url(u)).collect()
        }
        .boxed()
    }

    async fn fetch_document(&self, location: &str) -> Result<SitemapDocument, CensusError> {
        let body = self.fetcher.get(location, FetchOptions::default()).await?;
        parse_sitemap(&body).map_err(|message| CensusError::Xml {
            url: location.to_string(),
            message,
        })
    }
}
