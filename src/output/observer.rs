//! Pipeline observability sink
//!
//! The pipeline reports what it does to a `PipelineObserver` instead of
//! keeping counters of its own. The default observer forwards events to
//! `tracing`; `CountingObserver` keeps per-kind tallies.

use crate::record::PageKind;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives pipeline events. Every method defaults to a no-op.
pub trait PipelineObserver: Send + Sync {
    /// A URL was assigned a category by the classifier
    fn url_classified(&self, _url: &str, _kind: PageKind) {}

    /// A sitemap node was fetched and parsed
    fn sitemap_parsed(&self, _url: &str, _depth: u32, _entries: usize) {}

    /// A sitemap node failed and contributes nothing
    fn sitemap_failed(&self, _url: &str, _depth: u32, _error: &str) {}

    /// A URL was found by supplementary crawling
    fn url_supplemented(&self, _url: &str, _kind: PageKind) {}

    /// A page was extracted (`error` is set when the fallback record was used)
    fn page_extracted(&self, _url: &str, _kind: PageKind, _error: Option<&str>) {}

    /// A synthetic record was injected for coverage
    fn synthetic_injected(&self, _url: &str, _kind: PageKind) {}

    /// A scheduler window finished
    fn window_completed(&self, _window: usize, _size: usize, _failures: usize) {}
}

/// Forwards pipeline events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn url_classified(&self, url: &str, kind: PageKind) {
        tracing::trace!("Classified {} as {}", url, kind);
    }

    fn sitemap_parsed(&self, url: &str, depth: u32, entries: usize) {
        tracing::debug!("Sitemap {} (depth {}): {} entries", url, depth, entries);
    }

    fn sitemap_failed(&self, url: &str, depth: u32, error: &str) {
        tracing::warn!("Sitemap {} (depth {}) skipped: {}", url, depth, error);
    }

    fn url_supplemented(&self, url: &str, kind: PageKind) {
        tracing::debug!("Supplementary {} URL: {}", kind, url);
    }

    fn page_extracted(&self, url: &str, kind: PageKind, error: Option<&str>) {
        match error {
            Some(e) => tracing::warn!("Extraction failed for {}: {}", url, e),
            None => tracing::trace!("Extracted {} page {}", kind, url),
        }
    }

    fn synthetic_injected(&self, url: &str, kind: PageKind) {
        tracing::debug!("Injected synthetic {} record {}", kind, url);
    }

    fn window_completed(&self, window: usize, size: usize, failures: usize) {
        tracing::debug!(
            "Window {} done: {} items, {} failures",
            window,
            size,
            failures
        );
    }
}

/// Keeps atomic per-kind tallies of classification and extraction events
#[derive(Debug, Default)]
pub struct CountingObserver {
    classified: [AtomicUsize; 5],
    extracted: [AtomicUsize; 5],
    extraction_errors: AtomicUsize,
    synthetic: AtomicUsize,
    sitemap_failures: AtomicUsize,
}

fn slot(kind: PageKind) -> usize {
    match kind {
        PageKind::Product => 0,
        PageKind::Blog => 1,
        PageKind::Category => 2,
        PageKind::Static => 3,
        PageKind::Others => 4,
    }
}

impl CountingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classified(&self, kind: PageKind) -> usize {
        self.classified[slot(kind)].load(Ordering::Relaxed)
    }

    pub fn extracted(&self, kind: PageKind) -> usize {
        self.extracted[slot(kind)].load(Ordering::Relaxed)
    }

    pub fn extraction_errors(&self) -> usize {
        self.extraction_errors.load(Ordering::Relaxed)
    }

    pub fn synthetic(&self) -> usize {
        self.synthetic.load(Ordering::Relaxed)
    }

    pub fn sitemap_failures(&self) -> usize {
        self.sitemap_failures.load(Ordering::Relaxed)
    }
}

impl PipelineObserver for CountingObserver {
    fn url_classified(&self, _url: &str, kind: PageKind) {
        self.classified[slot(kind)].fetch_add(1, Ordering::Relaxed);
    }

    fn sitemap_failed(&self, _url: &str, _depth: u32, _error: &str) {
        self.sitemap_failures.fetch_add(1, Ordering::Relaxed);
    }

    fn page_extracted(&self, _url: &str, kind: PageKind, error: Option<&str>) {
        self.extracted[slot(kind)].fetch_add(1, Ordering::Relaxed);
        if error.is_some() {
            self.extraction_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn synthetic_injected(&self, _url: &str, _kind: PageKind) {
        self.synthetic.fetch_add(1, Ordering::Relaxed);
    }
}
