//! Pipeline coordinator - end-to-end census orchestration
//!
//! This module wires the stages together:
//! - Discovering page URLs from the site's sitemaps
//! - Classifying them into category buckets
//! - Supplementing under-represented categories
//! - Extracting every page through the batch scheduler
//! - Injecting synthetic coverage and computing statistics

use crate::classify::Classifier;
use crate::config::Config;
use crate::coverage::{CoverageGuarantor, LocaleRegistry};
use crate::crawler::{BatchScheduler, Fetcher};
use crate::extract::PageExtractor;
use crate::output::{PipelineObserver, TracingObserver};
use crate::record::{PageKind, PageRecord, PipelineResult};
use crate::sitemap::SitemapDiscovery;
use crate::CensusError;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

/// Cap on the number of discovered URLs carried into the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UrlLimit {
    #[default]
    Unlimited,
    Max(usize),
}

impl UrlLimit {
    /// Truncates `urls` to the limit
    pub fn apply(&self, mut urls: Vec<String>) -> Vec<String> {
        if let Self::Max(max) = self {
            urls.truncate(*max);
        }
        urls
    }
}

impl FromStr for UrlLimit {
    type Err = String;

    /// Parses `all`, `unlimited` or a non-negative integer
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") || s.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::Unlimited);
        }
        s.parse::<usize>()
            .map(Self::Max)
            .map_err(|_| format!("expected a number or 'all', got '{}'", s))
    }
}

impl fmt::Display for UrlLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("all"),
            Self::Max(max) => write!(f, "{}", max),
        }
    }
}

/// Main pipeline structure
#[derive(Clone)]
pub struct Pipeline {
    scheduler: BatchScheduler,
    discovery: SitemapDiscovery,
    classifier: Classifier,
    extractor: PageExtractor,
    coverage: CoverageGuarantor,
    observer: Arc<dyn PipelineObserver>,
}

impl Pipeline {
    /// Creates a pipeline that reports through tracing
    pub fn new(config: Config) -> Result<Self, CensusError> {
        Self::with_observer(config, Arc::new(TracingObserver))
    }

    /// Creates a pipeline reporting to the given observer
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(CensusError)` - The HTTP client could not be built
    pub fn with_observer(
        config: Config,
        observer: Arc<dyn PipelineObserver>,
    ) -> Result<Self, CensusError> {
        let fetcher = Fetcher::new(&config.fetcher, &config.user_agent)?;
        let scheduler = BatchScheduler::from_config(&config.scheduler);
        let classifier = Classifier::new(config.classifier.clone(), observer.clone());

        let discovery = SitemapDiscovery::new(
            fetcher.clone(),
            scheduler.clone(),
            config.discovery.max_depth,
            observer.clone(),
        );
        let extractor = PageExtractor::new(
            fetcher.clone(),
            &config.extraction,
            config.fetcher.page_timeout(),
            observer.clone(),
        );
        let coverage = CoverageGuarantor::new(
            fetcher,
            scheduler.clone(),
            classifier.clone(),
            config.coverage.clone(),
            observer.clone(),
        );

        Ok(Self {
            scheduler,
            discovery,
            classifier,
            extractor,
            coverage,
            observer,
        })
    }

    /// Replaces the locale packs used for synthetic coverage
    pub fn with_locales(mut self, locales: LocaleRegistry) -> Self {
        self.coverage = self.coverage.with_locales(locales);
        self
    }

    /// Discovers page URLs from a site or sitemap URL
    ///
    /// Duplicates are dropped before the limit is applied, so the cap counts
    /// distinct URLs.
    pub async fn discover(&self, entry: &str, limit: UrlLimit) -> Vec<String> {
        let discovered = self.discovery.discover(entry, 0).await;
        let found = discovered.len();

        let mut seen = HashSet::new();
        let unique: Vec<String> = discovered
            .into_iter()
            .filter(|url| seen.insert(url.clone()))
            .collect();

        let urls = limit.apply(unique);
        tracing::info!(
            "Discovered {} URLs ({} unique, {} kept with limit {})",
            found,
            seen.len(),
            urls.len(),
            limit
        );
        urls
    }

    /// Runs the full census for a site
    pub async fn run_site(&self, entry: &str, limit: UrlLimit) -> PipelineResult {
        let urls = self.discover(entry, limit).await;
        let origin = site_origin(entry);
        self.run_with_origin(urls, origin).await
    }

    /// Classifies, supplements, extracts and tops up the given URLs
    ///
    /// Statistics are computed from the final record set, not from the
    /// classifier's buckets, since extraction may settle on another kind.
    pub async fn run(&self, urls: Vec<String>) -> PipelineResult {
        let origin = urls.iter().find_map(|url| site_origin(url));
        self.run_with_origin(urls, origin).await
    }

    async fn run_with_origin(&self, urls: Vec<String>, origin: Option<Url>) -> PipelineResult {
        if urls.is_empty() {
            tracing::warn!("No URLs to process");
            return PipelineResult::default();
        }

        let mut buckets = self.classifier.bucket(&urls);
        log_buckets("Classified", |kind| buckets.len(kind));

        if let Some(origin) = &origin {
            self.coverage.supplement(&mut buckets, origin).await;
        }

        let work: Vec<(String, PageKind)> = buckets
            .entries()
            .map(|(kind, url)| (url.to_string(), kind))
            .collect();
        let work_urls: Vec<String> = work.iter().map(|(url, _)| url.clone()).collect();

        tracing::info!(
            "Extracting {} pages in windows of {}",
            work.len(),
            self.scheduler.window_size()
        );

        let extractor = &self.extractor;
        let observer = &self.observer;
        let outcomes = self
            .scheduler
            .run_with_progress(
                work,
                |(url, kind)| async move {
                    Ok::<_, CensusError>(extractor.extract(&url, Some(kind)).await)
                },
                |window, size, failures| observer.window_completed(window, size, failures),
            )
            .await;

        let mut records: BTreeMap<String, PageRecord> = BTreeMap::new();
        for (url, outcome) in work_urls.into_iter().zip(outcomes) {
            let record = match outcome {
                Ok(record) => record,
                Err(failure) => {
                    self.observer
                        .page_extracted(&url, PageKind::Others, Some(&failure.message));
                    PageRecord::fallback(&url, failure.message)
                }
            };
            records.insert(url, record);
        }

        if let Some(origin) = &origin {
            self.coverage.inject(&mut records, &buckets, origin);
        }

        let result = PipelineResult::from_records(records);
        log_buckets("Final", |kind| result.stats.get(kind));
        result
    }
}

/// Origin (`scheme://host[:port]/`) of an absolute http(s) URL
fn site_origin(url: &str) -> Option<Url> {
    let parsed = Url::parse(url).ok()?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }
    parsed.join("/").ok()
}

fn log_buckets(stage: &str, count: impl Fn(PageKind) -> usize) {
    let summary = PageKind::ALL
        .iter()
        .map(|kind| format!("{}={}", kind, count(*kind)))
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!("{} counts: {}", stage, summary);
}
