//! Page content extraction
//!
//! Turns one fetched HTML page into a [`PageRecord`]:
//! - envelope fields every record has (title, description, breadcrumb)
//! - kind detection from URL, DOM markers and the classifier's hint
//! - kind-specific fields from ordered selector chains
//!
//! Extraction never fails. A page that cannot be fetched becomes a
//! fallback record carrying the error.

pub mod blog;
pub mod category;
pub mod chain;
pub mod metadata;
pub mod product;
mod rules;
pub mod static_page;

pub use metadata::{extract_envelope, Envelope};
pub use rules::{CompiledRules, ExtractionRules, SelectorRule};

use crate::crawler::{FetchOptions, Fetcher};
use crate::output::PipelineObserver;
use crate::record::{PageKind, PagePayload, PageRecord};
use chrono::{DateTime, Utc};
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Decides the kind of a fetched page
///
/// Checked in priority blog, product, category. A kind matches when the URL
/// contains its path marker, the page matches its DOM marker, or the
/// classifier hint names it. Anything else is static.
pub fn detect_kind(
    url: &str,
    document: &Html,
    hint: Option<PageKind>,
    rules: &CompiledRules,
) -> PageKind {
    let lowered = url.to_lowercase();
    let checks: [(PageKind, &str, &[SelectorRule]); 3] = [
        (PageKind::Blog, "/blog/", rules.blog_marker.as_slice()),
        (PageKind::Product, "/product/", rules.product_marker.as_slice()),
        (PageKind::Category, "/category/", rules.category_marker.as_slice()),
    ];

    for (kind, needle, marker) in checks {
        if lowered.contains(needle) || chain::matches_any(document, marker) || hint == Some(kind)
        {
            return kind;
        }
    }

    PageKind::Static
}

/// Extracts a record from already-fetched HTML
pub fn extract_from_html(
    url: &str,
    html: &str,
    hint: Option<PageKind>,
    rules: &CompiledRules,
    now: DateTime<Utc>,
) -> PageRecord {
    let document = Html::parse_document(html);
    let base = match Url::parse(url) {
        Ok(base) => base,
        Err(e) => return PageRecord::fallback(url, format!("Invalid URL: {}", e)),
    };

    let envelope = extract_envelope(&document, url, rules);
    let kind = detect_kind(url, &document, hint, rules);

    let mut title = envelope.title.clone();
    let mut description = envelope.description.clone();

    let payload = match kind {
        PageKind::Product => PagePayload::Product(product::extract_product(
            &document,
            &base,
            &envelope.breadcrumb,
            rules,
        )),
        PageKind::Blog => {
            let blog = blog::extract_blog(&document, html, &base, &envelope, rules, now);
            description = blog.description;
            PagePayload::Blog(blog.details)
        }
        PageKind::Category => {
            PagePayload::Category(category::extract_category(&document, &base, rules))
        }
        PageKind::Static | PageKind::Others => {
            let page = static_page::extract_static(&document, &base, rules);
            if let Some(h1) = page.title {
                title = h1;
            }
            if let Some(content) = page.description {
                description = content;
            }
            PagePayload::Static(page.details)
        }
    };

    PageRecord {
        url: url.to_string(),
        title,
        description,
        timestamp: now,
        structured_data: envelope.structured_data,
        breadcrumb: envelope.breadcrumb,
        error: None,
        synthetic: false,
        payload,
    }
}

/// Fetches and extracts pages
#[derive(Clone)]
pub struct PageExtractor {
    fetcher: Fetcher,
    rules: Arc<CompiledRules>,
    page_timeout: Duration,
    observer: Arc<dyn PipelineObserver>,
}

impl PageExtractor {
    /// Creates an extractor, compiling the selector chains once
    pub fn new(
        fetcher: Fetcher,
        rules: &ExtractionRules,
        page_timeout: Duration,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            fetcher,
            rules: Arc::new(rules.compile()),
            page_timeout,
            observer,
        }
    }

    /// Fetches a page and extracts its record; fetch failures become fallbacks
    pub async fn extract(&self, url: &str, hint: Option<PageKind>) -> PageRecord {
        let record = match self
            .fetcher
            .get(url, FetchOptions::with_timeout(self.page_timeout))
            .await
        {
            Ok(html) => extract_from_html(url, &html, hint, &self.rules, Utc::now()),
            Err(e) => PageRecord::fallback(url, e.to_string()),
        };

        self.observer
            .page_extracted(url, record.kind(), record.error.as_deref());
        record
    }
}
