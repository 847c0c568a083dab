use crate::record::page::{PageKind, PageRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-kind record counts
///
/// Always computed by scanning final records, so each record is counted
/// exactly once under its own kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub total: usize,
    pub product: usize,
    pub blog: usize,
    pub category: usize,
    #[serde(rename = "static")]
    pub static_pages: usize,
    pub others: usize,
}

impl PipelineStats {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a PageRecord>) -> Self {
        let mut stats = Self::default();
        for record in records {
            stats.total += 1;
            *stats.slot_mut(record.kind()) += 1;
        }
        stats
    }

    pub fn get(&self, kind: PageKind) -> usize {
        match kind {
            PageKind::Product => self.product,
            PageKind::Blog => self.blog,
            PageKind::Category => self.category,
            PageKind::Static => self.static_pages,
            PageKind::Others => self.others,
        }
    }

    fn slot_mut(&mut self, kind: PageKind) -> &mut usize {
        match kind {
            PageKind::Product => &mut self.product,
            PageKind::Blog => &mut self.blog,
            PageKind::Category => &mut self.category,
            PageKind::Static => &mut self.static_pages,
            PageKind::Others => &mut self.others,
        }
    }
}

/// Output of one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineResult {
    pub records: BTreeMap<String, PageRecord>,
    pub stats: PipelineStats,
}

impl PipelineResult {
    /// Builds a result from a record map, deriving the statistics from it
    pub fn from_records(records: BTreeMap<String, PageRecord>) -> Self {
        let stats = PipelineStats::from_records(records.values());
        Self { records, stats }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Flat array form, ordered by URL
    pub fn to_vec(&self) -> Vec<PageRecord> {
        self.records.values().cloned().collect()
    }
}
