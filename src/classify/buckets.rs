use crate::record::PageKind;
use std::collections::{BTreeMap, HashSet};

/// Category → ordered URL list for one pipeline run
///
/// A URL is stored in at most one bucket; the first insertion wins.
#[derive(Debug, Clone, Default)]
pub struct CategoryBuckets {
    buckets: BTreeMap<PageKind, Vec<String>>,
    seen: HashSet<String>,
}

impl CategoryBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL to a bucket; returns false if the URL was already bucketed
    pub fn insert(&mut self, kind: PageKind, url: impl Into<String>) -> bool {
        let url = url.into();
        if !self.seen.insert(url.clone()) {
            return false;
        }
        self.buckets.entry(kind).or_default().push(url);
        true
    }

    pub fn get(&self, kind: PageKind) -> &[String] {
        self.buckets.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, kind: PageKind) -> usize {
        self.get(kind).len()
    }

    pub fn is_empty(&self, kind: PageKind) -> bool {
        self.get(kind).is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn total(&self) -> usize {
        self.seen.len()
    }

    /// Every bucketed URL with its kind, grouped in `PageKind` order
    pub fn entries(&self) -> impl Iterator<Item = (PageKind, &str)> {
        self.buckets
            .iter()
            .flat_map(|(kind, urls)| urls.iter().map(move |u| (*kind, u.as_str())))
    }
}
