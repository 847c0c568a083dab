//! Coverage guarantor
//!
//! Makes sure every reported category has records:
//! - targeted supplementary discovery from category and blog index pages
//! - synthetic records injected after extraction, in the site's locale

pub mod locale;
pub mod supplement;
pub mod synthetic;

pub use locale::{LocalePack, LocaleRegistry, SyntheticPage, SyntheticPost};

use crate::classify::{CategoryBuckets, Classifier};
use crate::config::CoverageConfig;
use crate::crawler::{BatchScheduler, Fetcher};
use crate::output::PipelineObserver;
use crate::record::{PageKind, PageRecord};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use supplement::{blog_category_pages, harvest_kind};
use url::Url;

#[derive(Clone)]
pub struct CoverageGuarantor {
    fetcher: Fetcher,
    scheduler: BatchScheduler,
    classifier: Classifier,
    config: CoverageConfig,
    locales: LocaleRegistry,
    observer: Arc<dyn PipelineObserver>,
}

impl CoverageGuarantor {
    pub fn new(
        fetcher: Fetcher,
        scheduler: BatchScheduler,
        classifier: Classifier,
        config: CoverageConfig,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            fetcher,
            scheduler,
            classifier,
            config,
            locales: LocaleRegistry::default(),
            observer,
        }
    }

    pub fn with_locales(mut self, locales: LocaleRegistry) -> Self {
        self.locales = locales;
        self
    }

    /// Adds product and blog URLs the sitemap left out
    ///
    /// - categories but no products: harvest product links from up to
    ///   `max-category-pages` category pages
    /// - no blogs: harvest blog links from `{origin}/blog`
    /// - category pages under `/blog/`: harvest their blog links too
    ///
    /// Returns the number of URLs added.
    pub async fn supplement(&self, buckets: &mut CategoryBuckets, origin: &Url) -> usize {
        let mut added = 0;

        if !buckets.is_empty(PageKind::Category) && buckets.is_empty(PageKind::Product) {
            let pages: Vec<String> = buckets
                .get(PageKind::Category)
                .iter()
                .take(self.config.max_category_pages)
                .cloned()
                .collect();
            tracing::info!(
                "No product URLs in sitemap, scanning {} category pages",
                pages.len()
            );
            let found = harvest_kind(
                &self.fetcher,
                &self.scheduler,
                &self.classifier,
                pages,
                PageKind::Product,
            )
            .await;
            added += self.add_all(buckets, PageKind::Product, found);
        }

        if buckets.is_empty(PageKind::Blog) {
            if let Ok(blog_index) = origin.join("/blog") {
                tracing::info!("No blog URLs in sitemap, scanning {}", blog_index);
                let found = harvest_kind(
                    &self.fetcher,
                    &self.scheduler,
                    &self.classifier,
                    vec![blog_index.to_string()],
                    PageKind::Blog,
                )
                .await;
                added += self.add_all(buckets, PageKind::Blog, found);
            }
        }

        let blog_categories = blog_category_pages(buckets.get(PageKind::Category));
        if !blog_categories.is_empty() {
            let found = harvest_kind(
                &self.fetcher,
                &self.scheduler,
                &self.classifier,
                blog_categories,
                PageKind::Blog,
            )
            .await;
            added += self.add_all(buckets, PageKind::Blog, found);
        }

        if added > 0 {
            tracing::info!("Supplementary discovery added {} URLs", added);
        }
        added
    }

    fn add_all(&self, buckets: &mut CategoryBuckets, kind: PageKind, urls: Vec<String>) -> usize {
        let mut added = 0;
        for url in urls {
            if buckets.insert(kind, url.clone()) {
                self.observer.url_supplemented(&url, kind);
                added += 1;
            }
        }
        added
    }

    /// Injects synthetic records in the locale detected from `buckets`
    pub fn inject(
        &self,
        records: &mut BTreeMap<String, PageRecord>,
        buckets: &CategoryBuckets,
        origin: &Url,
    ) -> usize {
        let pack = self.locales.detect(buckets);
        synthetic::inject_synthetic(
            records,
            pack,
            origin,
            self.config.min_category_records,
            self.observer.as_ref(),
            Utc::now(),
        )
    }
}
