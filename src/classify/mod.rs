//! URL classification
//!
//! This module maps a URL to one of the five content categories using the
//! ordered prefix tables in [`ClassifierRules`], and groups URL lists into
//! [`CategoryBuckets`].

mod buckets;
mod rules;

pub use buckets::CategoryBuckets;
pub use rules::ClassifierRules;

use crate::output::{PipelineObserver, TracingObserver};
use crate::record::PageKind;
use rules::{contains_any, starts_with_any};
use std::sync::Arc;
use url::Url;

/// Classifies a URL path (lowercase, without query string)
///
/// Rules are evaluated in the following order; the first match wins:
/// 1. Root path → Static
/// 2. Product prefixes → Product
/// 3. Blog content prefixes → Blog
/// 4. Category prefixes → Category
/// 5. Product-category prefixes, outside `/blog/` → Category
/// 6. Secondary product prefixes → Product
/// 7. Blog prefixes without a blog-category marker → Blog
/// 8. Static page prefixes → Static
/// 9. Others
///
/// Several rules overlap; the order above decides every overlap.
pub fn classify_path(path: &str, rules: &ClassifierRules) -> PageKind {
    if path.is_empty() || path == "/" {
        return PageKind::Static;
    }

    if starts_with_any(path, &rules.product_prefixes) {
        return PageKind::Product;
    }

    if starts_with_any(path, &rules.blog_content_prefixes) {
        return PageKind::Blog;
    }

    if starts_with_any(path, &rules.category_prefixes) {
        return PageKind::Category;
    }

    if starts_with_any(path, &rules.product_category_prefixes) && !path.contains("/blog/") {
        return PageKind::Category;
    }

    if starts_with_any(path, &rules.secondary_product_prefixes) {
        return PageKind::Product;
    }

    if starts_with_any(path, &rules.blog_prefixes)
        && !contains_any(path, &rules.blog_category_markers)
    {
        return PageKind::Blog;
    }

    if starts_with_any(path, &rules.static_prefixes) {
        return PageKind::Static;
    }

    PageKind::Others
}

/// Extracts the lowercased path used for classification
///
/// Accepts absolute URLs and bare paths. Returns None for anything else.
pub fn classification_path(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = Url::parse(trimmed) {
        return Some(parsed.path().to_lowercase());
    }

    if trimmed.starts_with('/') {
        let path = trimmed
            .split(|c| c == '?' || c == '#')
            .next()
            .unwrap_or(trimmed);
        return Some(path.to_lowercase());
    }

    None
}

/// URL classifier reporting every decision to an observer
#[derive(Clone)]
pub struct Classifier {
    rules: Arc<ClassifierRules>,
    observer: Arc<dyn PipelineObserver>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierRules::default(), Arc::new(TracingObserver))
    }
}

impl Classifier {
    pub fn new(rules: ClassifierRules, observer: Arc<dyn PipelineObserver>) -> Self {
        Self {
            rules: Arc::new(rules),
            observer,
        }
    }

    /// Classifies a URL; empty or malformed input is Static
    ///
    /// # Examples
    ///
    /// ```
    /// use site_census::classify::Classifier;
    /// use site_census::record::PageKind;
    ///
    /// let classifier = Classifier::default();
    /// assert_eq!(classifier.classify("https://x.com/urun/123"), PageKind::Product);
    /// assert_eq!(classifier.classify("https://x.com/random/xyz"), PageKind::Others);
    /// ```
    pub fn classify(&self, url: &str) -> PageKind {
        let kind = classification_path(url)
            .map(|path| classify_path(&path, &self.rules))
            .unwrap_or(PageKind::Static);
        self.observer.url_classified(url, kind);
        kind
    }

    /// Classifies every URL into buckets, dropping duplicates
    pub fn bucket<'a>(&self, urls: impl IntoIterator<Item = &'a String>) -> CategoryBuckets {
        let mut buckets = CategoryBuckets::new();
        for url in urls {
            let kind = self.classify(url);
            buckets.insert(kind, url.clone());
        }
        buckets
    }
}
